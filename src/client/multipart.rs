//! Multipart form fields for upload endpoints

use std::io::Read;

use reqwest::multipart::{Form, Part};

use crate::error::EncodingError;
use crate::pool::BufferPool;

/// One field of a `multipart/form-data` body.
///
/// Fields are sent in the order given.
pub enum MultipartField {
    /// A file part read from `reader` when the body is built.
    ///
    /// The reader is drained with blocking `Read` calls on the calling task
    /// before the request is sent, so it should be in-memory or otherwise
    /// fast. Load large files up front and pass them as [`MultipartField::Bytes`].
    File {
        name: String,
        file_name: String,
        reader: Box<dyn Read + Send>,
    },
    /// A file part whose content is already in memory; sent without copying.
    Bytes {
        name: String,
        file_name: String,
        data: Vec<u8>,
    },
    /// A plain form field
    Text { name: String, value: String },
}

impl std::fmt::Debug for MultipartField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipartField::File {
                name, file_name, ..
            } => f
                .debug_struct("File")
                .field("name", name)
                .field("file_name", file_name)
                .finish_non_exhaustive(),
            MultipartField::Bytes {
                name,
                file_name,
                data,
            } => f
                .debug_struct("Bytes")
                .field("name", name)
                .field("file_name", file_name)
                .field("len", &data.len())
                .finish(),
            MultipartField::Text { name, value } => f
                .debug_struct("Text")
                .field("name", name)
                .field("value", value)
                .finish(),
        }
    }
}

impl MultipartField {
    /// A file part whose content is read from `reader` when the body is built.
    ///
    /// See [`MultipartField::File`] for the blocking-read caveat.
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        reader: impl Read + Send + 'static,
    ) -> Self {
        MultipartField::File {
            name: name.into(),
            file_name: file_name.into(),
            reader: Box::new(reader),
        }
    }

    /// A file part from in-memory bytes.
    pub fn bytes(
        name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        MultipartField::Bytes {
            name: name.into(),
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        MultipartField::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MultipartField::File { name, .. }
            | MultipartField::Bytes { name, .. }
            | MultipartField::Text { name, .. } => name,
        }
    }
}

/// Build a form from `fields`, draining file readers through `pool`.
pub(crate) fn build_form(
    fields: Vec<MultipartField>,
    pool: &BufferPool,
) -> Result<Form, EncodingError> {
    let mut form = Form::new();

    for field in fields {
        form = match field {
            MultipartField::File {
                name,
                file_name,
                mut reader,
            } => {
                let mut buffer = pool.acquire();
                reader
                    .read_to_end(&mut buffer)
                    .map_err(|source| EncodingError::Io {
                        field: name.clone(),
                        source,
                    })?;
                // The pooled buffer stays with the pool; the form owns a copy.
                let part = Part::bytes(buffer.to_vec()).file_name(file_name);
                form.part(name, part)
            }
            MultipartField::Bytes {
                name,
                file_name,
                data,
            } => form.part(name, Part::bytes(data).file_name(file_name)),
            MultipartField::Text { name, value } => form.text(name, value),
        };
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn test_field_names() {
        assert_eq!(MultipartField::text("type", "image").name(), "type");
        assert_eq!(
            MultipartField::bytes("media", "a.jpg", vec![1u8]).name(),
            "media"
        );
        assert_eq!(
            MultipartField::file("thumb", "b.jpg", Cursor::new(vec![2u8])).name(),
            "thumb"
        );
    }

    #[test]
    fn test_debug_hides_content() {
        let field = MultipartField::bytes("media", "a.jpg", b"secret-bytes".to_vec());
        let debug = format!("{field:?}");
        assert!(debug.contains("a.jpg"));
        assert!(debug.contains("len: 12"));
        assert!(!debug.contains("secret"));

        let field = MultipartField::file("media", "a.jpg", Cursor::new(b"abc".to_vec()));
        assert!(!format!("{field:?}").contains("reader"));
    }

    #[test]
    fn test_in_memory_parts_skip_the_pool() {
        let pool = BufferPool::new(4, 16);
        let fields = vec![
            MultipartField::bytes("media", "a.jpg", b"first".to_vec()),
            MultipartField::text("description", "d"),
            MultipartField::bytes("thumb", "b.jpg", b"second".to_vec()),
        ];
        let form = build_form(fields, &pool).unwrap();
        assert!(!form.boundary().is_empty());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_reader_parts_return_buffers() {
        let pool = BufferPool::new(4, 16);
        let fields = vec![
            MultipartField::file("media", "a.jpg", Cursor::new(b"first".to_vec())),
            MultipartField::file("thumb", "b.jpg", Cursor::new(b"second".to_vec())),
        ];
        build_form(fields, &pool).unwrap();
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_build_form_read_error_names_field() {
        let pool = BufferPool::new(4, 16);
        let fields = vec![MultipartField::file("media", "a.jpg", FailingReader)];
        let err = build_form(fields, &pool).unwrap_err();
        assert!(matches!(err, EncodingError::Io { ref field, .. } if field == "media"));
        assert_eq!(pool.idle(), 1);
    }
}
