//! Portrait existence probe: create an off-tree image and ask the browser
//! to decode it. A portrait that decodes exists; everything else (404,
//! network failure, bad data) is a plain `false`.

use futures::future::LocalBoxFuture;
use pion_engine::ResourceProbe;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

pub struct ImageProbe;

impl ResourceProbe for ImageProbe {
    fn probe(&self, url: &str) -> LocalBoxFuture<'static, bool> {
        let url = url.to_string();
        Box::pin(async move {
            let Ok(image) = HtmlImageElement::new() else {
                return false;
            };
            image.set_src(&url);
            JsFuture::from(image.decode()).await.is_ok()
        })
    }
}
