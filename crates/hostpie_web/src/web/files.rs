use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

/// Read a dropped file as text. Read errors and user aborts reject the
/// promise and surface as one error kind.
pub(super) async fn read_file_text(file: web_sys::File) -> Result<String, String> {
    let promise = file_reader_text_promise(file)?;
    let v = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|_| "file: read failed".to_string())?;

    v.as_string()
        .ok_or_else(|| "file: expected a text result".to_string())
}

fn file_reader_text_promise(file: web_sys::File) -> Result<js_sys::Promise, String> {
    let reader =
        web_sys::FileReader::new().map_err(|_| "file: FileReader::new failed".to_string())?;
    reader
        .read_as_text(&file)
        .map_err(|_| "file: read_as_text failed".to_string())?;

    Ok(js_sys::Promise::new(&mut |resolve, reject| {
        let reject_load = reject.clone();
        let reject_err = reject.clone();
        let reject_abort = reject;
        let reader_ok = reader.clone();
        let onload =
            Closure::wrap(Box::new(
                move |_ev: web_sys::ProgressEvent| match reader_ok.result() {
                    Ok(v) => {
                        if v.is_null() || v.is_undefined() {
                            let _ = reject_load.call1(
                                &JsValue::UNDEFINED,
                                &JsValue::from_str("file: missing result"),
                            );
                        } else {
                            let _ = resolve.call1(&JsValue::UNDEFINED, &v);
                        }
                    }
                    Err(_) => {
                        let _ = reject_load.call1(
                            &JsValue::UNDEFINED,
                            &JsValue::from_str("file: result() threw"),
                        );
                    }
                },
            ) as Box<dyn FnMut(_)>);
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let onerror = Closure::wrap(Box::new(move |_ev: web_sys::ProgressEvent| {
            let _ = reject_err.call1(&JsValue::UNDEFINED, &JsValue::from_str("file: read error"));
        }) as Box<dyn FnMut(_)>);
        reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        let onabort = Closure::wrap(Box::new(move |_ev: web_sys::ProgressEvent| {
            let _ = reject_abort.call1(&JsValue::UNDEFINED, &JsValue::from_str("file: read aborted"));
        }) as Box<dyn FnMut(_)>);
        reader.set_onabort(Some(onabort.as_ref().unchecked_ref()));
        onabort.forget();
    }))
}
