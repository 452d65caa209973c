//! Score sharing
//!
//! On game over the final score can be handed to a social composer (when
//! the page runs inside a client that injects the `farcaster` SDK), the
//! Web Share API, or the clipboard, in that order. Everything here is best
//! effort: failures are logged and the simulation never waits on them.

/// Title used by the Web Share API
pub const SHARE_TITLE: &str = "Ultra Ping Pong";
/// Social composer endpoint
pub const COMPOSER_URL: &str = "https://warpcast.com/~/compose";

/// Text and link describing a finished match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub text: String,
    /// Page to embed (the game itself)
    pub url: String,
}

impl ShareMessage {
    pub fn new(player_score: u32, ai_score: u32, page_url: &str) -> Self {
        Self {
            text: format!(
                "I scored {player_score}-{ai_score} in Ultra Ping Pong! 🎮✨ Can you beat me?"
            ),
            url: page_url.to_string(),
        }
    }

    /// Composer link. `encode` must percent-encode a URI component.
    pub fn compose_url(&self, encode: impl Fn(&str) -> String) -> String {
        format!(
            "{COMPOSER_URL}?text={}&embeds[]={}",
            encode(&self.text),
            encode(&self.url)
        )
    }

    /// Clipboard payload
    pub fn clipboard_text(&self) -> String {
        if self.url.is_empty() {
            self.text.clone()
        } else {
            format!("{} {}", self.text, self.url)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{share, signal_ready};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use super::{SHARE_TITLE, ShareMessage};

    #[wasm_bindgen(inline_js = "
        export function sdk_available() {
            return typeof window !== 'undefined' && !!window.farcaster;
        }

        export function sdk_open_url(url) {
            window.farcaster.actions.openUrl(url);
        }

        export async function sdk_ready() {
            if (!window.farcaster) {
                return false;
            }
            await window.farcaster.context;
            window.farcaster.actions.ready();
            return true;
        }

        export async function web_share(title, text, url) {
            if (navigator.share) {
                await navigator.share({ title, text, url });
                return true;
            }
            return false;
        }

        export async function copy_to_clipboard(text) {
            if (navigator.clipboard) {
                await navigator.clipboard.writeText(text);
                return true;
            }
            return false;
        }
    ")]
    extern "C" {
        fn sdk_available() -> bool;
        #[wasm_bindgen(catch)]
        fn sdk_open_url(url: &str) -> Result<(), JsValue>;
        fn sdk_ready() -> js_sys::Promise;
        fn web_share(title: &str, text: &str, url: &str) -> js_sys::Promise;
        fn copy_to_clipboard(text: &str) -> js_sys::Promise;
    }

    /// Await a JS promise resolving to a bool; rejections count as false
    async fn resolved_true(promise: js_sys::Promise) -> bool {
        match JsFuture::from(promise).await {
            Ok(v) => v.as_bool().unwrap_or(false),
            Err(e) => {
                log::warn!("Share step failed: {:?}", e);
                false
            }
        }
    }

    /// Fire-and-forget share of a finished match
    pub fn share(message: ShareMessage) {
        wasm_bindgen_futures::spawn_local(async move {
            if sdk_available() {
                let url = message.compose_url(|s| String::from(js_sys::encode_uri_component(s)));
                match sdk_open_url(&url) {
                    Ok(()) => {
                        log::info!("Opened composer");
                        return;
                    }
                    Err(e) => log::warn!("Composer unavailable: {:?}", e),
                }
            }

            if resolved_true(web_share(SHARE_TITLE, &message.text, &message.url)).await {
                log::info!("Shared via Web Share API");
                return;
            }

            if resolved_true(copy_to_clipboard(&message.clipboard_text())).await {
                log::info!("Score copied to clipboard");
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message("Score copied to clipboard!");
                }
                return;
            }

            log::warn!("No share target available");
        });
    }

    /// One-shot readiness handshake with the host client, if any. Nothing
    /// in the game depends on its outcome.
    pub fn signal_ready() {
        wasm_bindgen_futures::spawn_local(async {
            if resolved_true(sdk_ready()).await {
                log::info!("Host SDK ready");
            } else {
                log::debug!("No host SDK");
            }
        });
    }
}
