//! Browser implementations of the two clipboard paths.

use futures::future::LocalBoxFuture;
use shared::{ClipboardWriter, Pane, SelectionCopier};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use crate::browser::{PANE_ATTRIBUTE, describe_js_error, window};

fn js_error(value: JsValue) -> String {
    describe_js_error(&value)
}

/// `navigator.clipboard.writeText`.
#[derive(Clone, Copy, Default)]
pub struct NavigatorClipboard;

impl ClipboardWriter for NavigatorClipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), String>> {
        let text = text.to_owned();
        Box::pin(async move {
            let navigator = window()?.navigator();
            // Missing outside secure contexts
            let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
                .map_err(js_error)?;
            if clipboard.is_undefined() || clipboard.is_null() {
                return Err("Clipboard API is not available".to_owned());
            }
            JsFuture::from(navigator.clipboard().write_text(&text))
                .await
                .map(|_| ())
                .map_err(js_error)
        })
    }
}

/// Selects the pane's DOM content and runs `document.execCommand("copy")`.
#[derive(Clone, Copy, Default)]
pub struct SelectionFallback;

impl SelectionCopier for SelectionFallback {
    fn copy_pane_selection(&self, pane: Pane) -> Result<(), String> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| "no document".to_owned())?;
        let selector = format!("[{PANE_ATTRIBUTE}=\"{}\"]", pane.dom_name());
        let element = document
            .query_selector(&selector)
            .map_err(js_error)?
            .ok_or_else(|| format!("{pane} pane is not rendered"))?;
        let selection = window
            .get_selection()
            .map_err(js_error)?
            .ok_or_else(|| "selection is not available".to_owned())?;

        selection.remove_all_ranges().map_err(js_error)?;
        let text_area = element.dyn_ref::<HtmlTextAreaElement>();
        if let Some(text_area) = text_area {
            text_area.select();
        } else {
            let range = document.create_range().map_err(js_error)?;
            range.select_node_contents(&element).map_err(js_error)?;
            selection.add_range(&range).map_err(js_error)?;
        }

        let copied = document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| "document is not an HTML document".to_owned())
            .and_then(|document| document.exec_command("copy").map_err(js_error));

        // A textarea keeps its own selection, outside the document's ranges
        if let Some(text_area) = text_area {
            text_area.set_selection_range(0, 0).map_err(js_error)?;
        }
        selection.remove_all_ranges().map_err(js_error)?;

        match copied? {
            true => Ok(()),
            false => Err("copy command was rejected".to_owned()),
        }
    }
}
