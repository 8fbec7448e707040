//! Resource loading for WASM32 (web) targets.

use async_trait::async_trait;
use bytes::Bytes;
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, WorkerGlobalScope};

use crate::error::GeoViewError;
use crate::platform::ResourceLoader;

/// Loader using the browser `fetch` API.
#[derive(Debug, Default, Clone)]
pub struct WebLoader {}

fn js_error(url: &str, value: wasm_bindgen::JsValue) -> GeoViewError {
    GeoViewError::network(url, format!("{value:?}"))
}

#[async_trait(?Send)]
impl ResourceLoader for WebLoader {
    async fn load_bytes(&self, url: &str) -> Result<Bytes, GeoViewError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request =
            Request::new_with_str_and_init(url, &opts).map_err(|err| js_error(url, err))?;

        let resp_value = if let Some(window) = web_sys::window() {
            JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(|err| js_error(url, err))?
        } else if let Ok(global) = js_sys::global().dyn_into::<WorkerGlobalScope>() {
            JsFuture::from(global.fetch_with_request(&request))
                .await
                .map_err(|err| js_error(url, err))?
        } else {
            return Err(GeoViewError::network(url, "global object is not available"));
        };

        let resp: Response = resp_value.dyn_into().map_err(|err| js_error(url, err))?;
        if !resp.ok() {
            return Err(GeoViewError::network(url, resp.status()));
        }

        let buffer = resp.array_buffer().map_err(|err| js_error(url, err))?;
        let bytes_val = JsFuture::from(buffer)
            .await
            .map_err(|err| js_error(url, err))?;
        let array = Uint8Array::new(&bytes_val);
        Ok(array.to_vec().into())
    }
}
