//! Image references and the loaders that turn them into engine input.

use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::debug;

use crate::error::ResourceError;
use crate::models::config::LoaderConfig;

/// A path or URI naming an image, as received from the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference(String);

impl ImageReference {
    /// Wrap a host-supplied reference. Returns `None` if it is empty.
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        if reference.is_empty() {
            None
        } else {
            Some(Self(reference))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme, if the reference starts with `<scheme>://`.
    ///
    /// Schemes follow RFC 3986: an ASCII letter, then letters, digits, `+`, `-` or `.`.
    pub fn scheme(&self) -> Option<&str> {
        let (scheme, _) = self.0.split_once("://")?;
        let mut chars = scheme.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then_some(scheme)
    }

    /// The reference with a leading `file://` (any case) removed.
    pub fn without_file_scheme(&self) -> &str {
        match self.scheme() {
            Some(scheme) if scheme.eq_ignore_ascii_case("file") => &self.0[scheme.len() + 3..],
            _ => &self.0,
        }
    }

    /// Check for a URI scheme other than `file://`.
    pub fn has_foreign_scheme(&self) -> bool {
        self.scheme().is_some_and(|scheme| !scheme.eq_ignore_ascii_case("file"))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image-loading collaborator.
pub trait ImageLoader {
    /// What the paired engine consumes.
    type Image;

    /// Resolve a reference into engine input.
    fn load(&self, reference: &ImageReference) -> Result<Self::Image, ResourceError>;
}

/// Loads and decodes local image files.
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    strip_file_scheme: bool,
}

impl FileImageLoader {
    pub fn new() -> Self {
        Self {
            strip_file_scheme: true,
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new().with_strip_file_scheme(config.strip_file_scheme)
    }

    /// Configure `file://` prefix stripping.
    pub fn with_strip_file_scheme(mut self, strip: bool) -> Self {
        self.strip_file_scheme = strip;
        self
    }

    fn local_path(&self, reference: &ImageReference) -> Result<PathBuf, ResourceError> {
        if reference.has_foreign_scheme() {
            return Err(ResourceError::Unsupported(reference.to_string()));
        }
        let path = if self.strip_file_scheme {
            reference.without_file_scheme()
        } else {
            reference.as_str()
        };
        Ok(PathBuf::from(path))
    }
}

impl Default for FileImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader for FileImageLoader {
    type Image = DynamicImage;

    fn load(&self, reference: &ImageReference) -> Result<DynamicImage, ResourceError> {
        let path = self.local_path(reference)?;

        let data = std::fs::read(&path).map_err(|source| ResourceError::Unreadable {
            path: path.clone(),
            source,
        })?;

        let decode_error = |source| ResourceError::Decode {
            path: path.clone(),
            source,
        };

        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|source| ResourceError::Unreadable {
                path: path.clone(),
                source,
            })?;
        let mut decoder = reader.into_decoder().map_err(decode_error)?;
        let orientation = decoder.orientation().map_err(decode_error)?;
        let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        image.apply_orientation(orientation);

        debug!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            orientation
        );

        Ok(image)
    }
}

/// Hands the reference through untouched, for engines that load images themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriPassthrough;

impl ImageLoader for UriPassthrough {
    type Image = String;

    fn load(&self, reference: &ImageReference) -> Result<String, ResourceError> {
        Ok(reference.as_str().to_string())
    }
}
