use std::rc::Rc;

use fauxterm_data::{Font, FontId, FontImage};
use glow::HasContext;

use crate::Error;

/// A font's pages uploaded as one `TEXTURE_2D_ARRAY` layer per page.
#[derive(Debug)]
pub(crate) struct FontTexture {
    gl_texture: glow::Texture,
}

impl FontTexture {
    pub(crate) fn upload(gl: &glow::Context, image: &FontImage) -> Result<Self, Error> {
        let to_i32 = |v: usize| {
            i32::try_from(v)
                .map_err(|_| Error::texture_creation_failed(format!("dimension {v} too large")))
        };
        let width = to_i32(image.width() as usize)?;
        let height = to_i32(image.height() as usize)?;
        let pages = to_i32(image.pages())?;

        let gl_texture = unsafe { gl.create_texture() }.map_err(Error::texture_creation_failed)?;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D_ARRAY, Some(gl_texture));
            gl.tex_storage_3d(glow::TEXTURE_2D_ARRAY, 1, glow::RGBA8, width, height, pages);

            #[rustfmt::skip]
            gl.tex_sub_image_3d(
                glow::TEXTURE_2D_ARRAY,
                0, // level
                0, 0, 0, // offset
                width, height, pages, // texture size
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.pixels())),
            );
        }

        setup_sampling(gl);
        unsafe { gl.bind_texture(glow::TEXTURE_2D_ARRAY, None) };

        tracing::debug!(width, height, pages, "font texture uploaded");
        Ok(Self { gl_texture })
    }

    pub(crate) fn bind(&self, gl: &glow::Context) {
        unsafe { gl.bind_texture(glow::TEXTURE_2D_ARRAY, Some(self.gl_texture)) };
    }

    pub(crate) fn delete(&self, gl: &glow::Context) {
        unsafe { gl.delete_texture(self.gl_texture) };
    }
}

fn setup_sampling(gl: &glow::Context) {
    let params = [
        (glow::TEXTURE_MIN_FILTER, glow::NEAREST),
        (glow::TEXTURE_MAG_FILTER, glow::NEAREST),
        (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
        (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
    ];
    for (name, value) in params {
        unsafe { gl.tex_parameter_i32(glow::TEXTURE_2D_ARRAY, name, value as i32) };
    }
}

/// Font textures keyed by font identity.
///
/// Textures are uploaded on first use and kept until [`delete`] is called.
/// Lookup is linear: a console only ever has a handful of fonts.
///
/// [`delete`]: FontTextureCache::delete
#[derive(Debug, Default)]
pub(crate) struct FontTextureCache {
    textures: Vec<(FontId, FontTexture)>,
}

impl FontTextureCache {
    pub(crate) fn get_or_upload(
        &mut self,
        gl: &glow::Context,
        font: &Rc<Font>,
    ) -> Result<&FontTexture, Error> {
        let index = match self.textures.iter().position(|(id, _)| *id == font.id()) {
            Some(index) => index,
            None => {
                let texture = FontTexture::upload(gl, font.image())?;
                tracing::debug!(font = font.name(), id = font.id().get(), "font texture cached");
                self.textures.push((font.id(), texture));
                self.textures.len() - 1
            },
        };

        Ok(&self.textures[index].1)
    }

    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    pub(crate) fn delete(&mut self, gl: &glow::Context) {
        for (_, texture) in self.textures.drain(..) {
            texture.delete(gl);
        }
    }
}
