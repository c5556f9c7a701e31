//! Texture loading: decode an image file with `image`, upload it to a 2D texture.
use crate::api as gl;
use crate::api::types::*;
use crate::api::Gl;
use image::{DynamicImage, GenericImageView};
use std::error;
use std::fmt;
use std::io;
use std::os::raw::c_void;
use std::path::Path;

#[derive(Debug)]
pub enum ImageLoadError {
    Io(io::Error),
    Decode(image::ImageError),
}

impl From<image::ImageError> for ImageLoadError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(err) => ImageLoadError::Io(err),
            other => ImageLoadError::Decode(other),
        }
    }
}

impl fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageLoadError::Io(err) => fmt::Display::fmt(err, f),
            ImageLoadError::Decode(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for ImageLoadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ImageLoadError::Io(err) => Some(err),
            ImageLoadError::Decode(err) => Some(err),
        }
    }
}

//--------------------------------------------------------------------------------------------------
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    pub fn to_glenum(self) -> GLenum {
        match self {
            PixelFormat::Rgb8 => gl::RGB,
            PixelFormat::Rgba8 => gl::RGBA,
        }
    }
}

/// Row-major, 8 bits per channel pixel data.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

/// Decodes an image file. The channel count is inferred from the file: images with an alpha
/// channel become RGBA8, everything else RGB8.
///
/// GL expects the first row at the bottom of the image; pass `flip_vertically` to match.
pub fn decode_image<P: AsRef<Path>>(
    path: P,
    flip_vertically: bool,
) -> Result<DecodedImage, ImageLoadError> {
    let img = image::open(path)?;
    let img = if flip_vertically { img.flipv() } else { img };
    let (width, height) = GenericImageView::dimensions(&img);

    let (format, data) = match img {
        DynamicImage::ImageRgb8(rgb) => (PixelFormat::Rgb8, rgb.into_raw()),
        DynamicImage::ImageRgba8(rgba) => (PixelFormat::Rgba8, rgba.into_raw()),
        other => {
            if other.color().has_alpha() {
                (PixelFormat::Rgba8, other.into_rgba8().into_raw())
            } else {
                (PixelFormat::Rgb8, other.into_rgb8().into_raw())
            }
        }
    };

    Ok(DecodedImage {
        width,
        height,
        format,
        data,
    })
}

//--------------------------------------------------------------------------------------------------
#[derive(Copy, Clone, Debug)]
pub struct TextureParams {
    pub wrap: GLenum,
    pub min_filter: GLenum,
    pub mag_filter: GLenum,
    pub flip_vertically: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            wrap: gl::REPEAT,
            min_filter: gl::LINEAR,
            mag_filter: gl::LINEAR,
            flip_vertically: true,
        }
    }
}

/// A 2D texture object.
#[derive(Debug)]
pub struct Texture {
    obj: GLuint,
}

impl Texture {
    /// Creates an empty texture object with the sampling parameters set.
    pub fn new(gl: &Gl, params: &TextureParams) -> Texture {
        unsafe {
            let mut obj = 0;
            gl.GenTextures(1, &mut obj);
            gl.BindTexture(gl::TEXTURE_2D, obj);
            gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, params.wrap as GLint);
            gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, params.wrap as GLint);
            gl.TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                params.min_filter as GLint,
            );
            gl.TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                params.mag_filter as GLint,
            );
            Texture { obj }
        }
    }

    /// Uploads the decoded pixels as mip level 0 and generates the rest of the chain.
    pub fn upload(&self, gl: &Gl, image: &DecodedImage) {
        let format = image.format.to_glenum();
        unsafe {
            gl.BindTexture(gl::TEXTURE_2D, self.obj);
            // RGB rows are not 4-byte aligned in general
            gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl.TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                format,
                gl::UNSIGNED_BYTE,
                image.data.as_ptr() as *const c_void,
            );
            gl.GenerateMipmap(gl::TEXTURE_2D);
        }
    }

    /// Creates a texture from an image file.
    pub fn from_path<P: AsRef<Path>>(
        gl: &Gl,
        path: P,
        params: &TextureParams,
    ) -> Result<Texture, ImageLoadError> {
        let image = decode_image(path.as_ref(), params.flip_vertically)?;
        let texture = Texture::new(gl, params);
        texture.upload(gl, &image);
        debug!(
            "loaded texture `{}` ({}x{}, {:?})",
            path.as_ref().display(),
            image.width,
            image.height,
            image.format
        );
        Ok(texture)
    }

    /// Like [Texture::from_path], but logs failures and returns a texture with no image.
    pub fn load_or_empty<P: AsRef<Path>>(gl: &Gl, path: P, params: &TextureParams) -> Texture {
        match Texture::from_path(gl, path.as_ref(), params) {
            Ok(texture) => texture,
            Err(err) => {
                error!(
                    "failed to load texture `{}`: {}",
                    path.as_ref().display(),
                    err
                );
                Texture::new(gl, params)
            }
        }
    }

    pub fn obj(&self) -> GLuint {
        self.obj
    }

    /// Binds the texture to texture unit `unit`.
    pub fn bind(&self, gl: &Gl, unit: u32) {
        unsafe {
            gl.ActiveTexture(gl::TEXTURE0 + unit);
            gl.BindTexture(gl::TEXTURE_2D, self.obj);
        }
    }

    pub fn destroy(self, gl: &Gl) {
        unsafe { gl.DeleteTextures(1, &self.obj) }
    }
}
