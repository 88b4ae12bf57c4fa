mod logging;

// Browser-side state; on the host only the tests reach it.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod animation;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod contact;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod content;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod cursor;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod notice;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod relay;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod scene;

#[cfg(target_arch = "wasm32")]
mod background;
#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
mod server;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
