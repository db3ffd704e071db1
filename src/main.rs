#[cfg(any(target_arch = "wasm32", test))]
mod card;
#[cfg(any(target_arch = "wasm32", test))]
mod config;
#[cfg(any(target_arch = "wasm32", test))]
mod debounce;
#[cfg(any(target_arch = "wasm32", test))]
mod interactivity;
#[cfg(any(target_arch = "wasm32", test))]
mod log;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project runs in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
