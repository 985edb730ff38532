//! Asynchronous texture loading.
//!
//! Three image resources are requested at fixed paths at startup. Each load
//! resolves independently: the raw bytes are fetched and decoded off the
//! event loop, then posted back through the event-loop proxy so the GPU
//! upload happens on the loop thread. A slot that fails stays on its
//! placeholder for good.

use anyhow::Result;

/// The three material texture slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    Color,
    Height,
    Alpha,
}

impl TextureKind {
    pub const ALL: [TextureKind; 3] = [TextureKind::Color, TextureKind::Height, TextureKind::Alpha];

    /// Fixed asset path for this slot.
    pub fn path(self) -> &'static str {
        match self {
            TextureKind::Color => "textures/texture.jpg",
            TextureKind::Height => "textures/height.png",
            TextureKind::Alpha => "textures/alpha.gif",
        }
    }

    /// Color data is sRGB; height and alpha are sampled as linear data.
    pub fn is_srgb(self) -> bool {
        matches!(self, TextureKind::Color)
    }
}

/// Load progress of one material texture slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let origin = location.origin().unwrap();
    let base = reqwest::Url::parse(&format!("{}/", origin)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_binary(file_name: &str) -> Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = tokio::fs::read(file_name).await?;

    Ok(data)
}

/// Fetch and decode one image. Runs off the event loop; the caller turns the
/// result into a GPU texture once it lands back there.
pub async fn load_image(kind: TextureKind) -> Result<image::DynamicImage> {
    let data = load_binary(kind.path()).await?;
    Ok(image::load_from_memory(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths_are_fixed() {
        assert_eq!(TextureKind::Color.path(), "textures/texture.jpg");
        assert_eq!(TextureKind::Height.path(), "textures/height.png");
        assert_eq!(TextureKind::Alpha.path(), "textures/alpha.gif");
    }

    #[test]
    fn only_the_color_map_is_srgb() {
        assert!(TextureKind::Color.is_srgb());
        assert!(!TextureKind::Height.is_srgb());
        assert!(!TextureKind::Alpha.is_srgb());
    }

    #[test]
    fn slots_start_pending() {
        assert_eq!(LoadState::default(), LoadState::Pending);
    }

    #[tokio::test]
    async fn missing_file_reports_failure() {
        let result = load_binary("textures/does-not-exist.png").await;
        assert!(result.is_err());
    }
}
