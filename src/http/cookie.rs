use std::collections::HashMap;

/// Name/value pairs from one `Cookie` header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// Parses `k1=v1; k2=v2`. Pairs without `=` are skipped, never an error.
    pub fn parse(header_value: &str) -> Self {
        let cookies = header_value
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
            .collect();
        Self { cookies }
    }

    pub fn find(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_pairs_and_trims() {
        let jar = CookieJar::parse("yummy_cookie=choco;  tasty_cookie=strawberry ; JSESSIONID=656cef62");
        assert_eq!(jar.len(), 3);
        assert_eq!(jar.find("yummy_cookie"), Some("choco"));
        assert_eq!(jar.find("tasty_cookie"), Some("strawberry"));
        assert_eq!(jar.find("JSESSIONID"), Some("656cef62"));
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let jar = CookieJar::parse("token=a=b==");
        assert_eq!(jar.find("token"), Some("a=b=="));
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let jar = CookieJar::parse("garbage; ;id=1;");
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.find("id"), Some("1"));
        assert_eq!(jar.find("garbage"), None);
    }

    #[test]
    fn empty_header_gives_empty_jar() {
        assert!(CookieJar::parse("").is_empty());
    }
}
