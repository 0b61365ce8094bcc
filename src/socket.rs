use tokio::io::AsyncRead;

pub trait Socket: AsyncRead + Unpin + Send {}
impl<T: AsyncRead + Unpin + Send> Socket for T {}
