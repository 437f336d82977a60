use crate::domain::model::ImageSource;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// OCR 協作者：輸入影像與語言代碼，回傳以換行分隔的文字
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, image: &ImageSource, language: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}
