//! URL-encoded form bodies
//!
//! Reads and decodes the bodies of the board's form posts.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form body exceeds {0} bytes")]
    TooLarge(u64),

    #[error("failed to read form body: {0}")]
    Read(String),

    #[error("malformed form body: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}

/// `POST /submit`
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub post: Option<String>,
}

/// `POST /delete`
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
}

/// `POST /update`
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
    #[serde(rename = "updatedContent")]
    pub updated_content: Option<String>,
}

/// Collect at most `limit` bytes of body and decode it as a form
pub async fn read_form<B, T>(body: B, limit: u64) -> Result<T, FormError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    T: DeserializeOwned,
{
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    let collected = Limited::new(body, max).collect().await.map_err(|e| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            FormError::TooLarge(limit)
        } else {
            FormError::Read(e.to_string())
        }
    })?;

    Ok(serde_urlencoded::from_bytes(&collected.to_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn body(s: &'static str) -> Full<Bytes> {
        Full::new(Bytes::from_static(s.as_bytes()))
    }

    #[tokio::test]
    async fn test_decodes_update_form() {
        let form: UpdateForm = read_form(body("itemId=3&updatedContent=hello+world%21"), 1024)
            .await
            .unwrap();
        assert_eq!(form.item_id.as_deref(), Some("3"));
        assert_eq!(form.updated_content.as_deref(), Some("hello world!"));
    }

    #[tokio::test]
    async fn test_missing_fields_are_none() {
        let form: SubmitForm = read_form(body(""), 1024).await.unwrap();
        assert!(form.post.is_none());

        let form: UpdateForm = read_form(body("itemId=1"), 1024).await.unwrap();
        assert!(form.updated_content.is_none());
    }

    #[tokio::test]
    async fn test_body_limit() {
        let err = read_form::<_, SubmitForm>(body("post=0123456789"), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::TooLarge(8)));
    }
}
