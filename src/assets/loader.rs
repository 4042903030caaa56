//! Browser image loading
//!
//! All assets load concurrently and are joined; each load tries its sources
//! in order and falls back internally, so the join always completes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{AssetId, AssetOutcome, AssetSpec, Fallback, LoadProgress};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image {0}")]
    Load(String),
    #[error("failed to build placeholder: {0}")]
    Placeholder(String),
}

/// A drawable image: the real thing or a generated placeholder
#[derive(Debug, Clone)]
pub enum Image {
    Element(HtmlImageElement),
    Placeholder(HtmlCanvasElement),
}

/// Resolved assets, keyed by slot. Slots that fell back to a solid fill are absent.
#[derive(Debug, Default)]
pub struct Assets {
    images: HashMap<AssetId, Image>,
}

impl Assets {
    pub fn get(&self, id: AssetId) -> Option<&Image> {
        self.images.get(&id)
    }
}

/// Load every asset in `specs`, updating `progress` as each one resolves
pub async fn load_all(specs: Vec<AssetSpec>, progress: Rc<RefCell<LoadProgress>>) -> Assets {
    let loads = specs
        .into_iter()
        .map(|spec| load_one(spec, progress.clone()));
    let resolved = futures::future::join_all(loads).await;

    let images = resolved
        .into_iter()
        .filter_map(|(id, image)| image.map(|image| (id, image)))
        .collect();
    Assets { images }
}

async fn load_one(spec: AssetSpec, progress: Rc<RefCell<LoadProgress>>) -> (AssetId, Option<Image>) {
    for src in &spec.sources {
        match load_image(src).await {
            Ok(img) => {
                progress.borrow_mut().record(AssetOutcome::Loaded);
                return (spec.id, Some(Image::Element(img)));
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    log::warn!("No source loaded for {:?}, using fallback", spec.id);
    let image = match make_placeholder(&spec.fallback) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    };
    progress.borrow_mut().record(AssetOutcome::FellBack);
    (spec.id, image)
}

async fn load_image(src: &str) -> Result<HtmlImageElement, AssetError> {
    let img = HtmlImageElement::new().map_err(|_| AssetError::Load(src.to_owned()))?;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(src);

    let result = JsFuture::from(promise).await;
    img.set_onload(None);
    img.set_onerror(None);
    result.map_err(|_| AssetError::Load(src.to_owned()))?;

    if img.natural_width() == 0 {
        return Err(AssetError::Load(src.to_owned()));
    }
    Ok(img)
}

fn make_placeholder(fallback: &Fallback) -> Result<Option<Image>, AssetError> {
    let (size, color, glyph) = match fallback {
        Fallback::SolidFill => return Ok(None),
        Fallback::RandomHue { size } => {
            let hue = js_sys::Math::random() * 360.0;
            (*size, format!("hsl({:.0}, 70%, 50%)", hue), None)
        }
        Fallback::Swatch { size, color, glyph } => (*size, color.to_string(), Some(*glyph)),
    };

    let err = |e: wasm_bindgen::JsValue| AssetError::Placeholder(format!("{:?}", e));
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AssetError::Placeholder("no document".into()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(err)?
        .dyn_into()
        .map_err(|_| AssetError::Placeholder("not a canvas".into()))?;
    canvas.set_width(size);
    canvas.set_height(size);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(err)?
        .ok_or_else(|| AssetError::Placeholder("no 2d context".into()))?
        .dyn_into()
        .map_err(|_| AssetError::Placeholder("not a 2d context".into()))?;

    let size = size as f64;
    ctx.set_fill_style_str(&color);
    ctx.fill_rect(0.0, 0.0, size, size);

    if let Some(glyph) = glyph {
        ctx.set_fill_style_str("white");
        ctx.set_font("20px Arial");
        ctx.set_text_align("center");
        ctx.fill_text(glyph, size / 2.0, size / 2.0 + 5.0).map_err(err)?;
    }

    Ok(Some(Image::Placeholder(canvas)))
}
