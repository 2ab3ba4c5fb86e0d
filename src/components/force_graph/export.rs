use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlAnchorElement, HtmlCanvasElement};

/// Rasterizes the canvas as it is currently drawn and downloads it as a PNG.
pub fn export_png(canvas: &HtmlCanvasElement, file_name: &str) -> Result<(), JsValue> {
	let url = canvas.to_data_url_with_type("image/png")?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	info!("Exported network view as {file_name}");
	Ok(())
}

/// [`export_png`] for UI callbacks: failures are logged, not returned.
pub fn export_or_log(canvas: &HtmlCanvasElement, file_name: &str) -> bool {
	match export_png(canvas, file_name) {
		Ok(()) => true,
		Err(e) => {
			error!("Failed to export network: {e:?}");
			false
		}
	}
}
