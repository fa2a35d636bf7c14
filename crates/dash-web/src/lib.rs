pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates the `thread_local!` storage for the GameRunner, a
/// `with_runner()` helper and the wasm-bindgen exports (init, tick, input
/// handlers, data accessors).
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use dash_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// dash_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: a type implementing `dash_engine::Game` with an inherent
///   `fn new(seed: u64) -> Self`
/// - `$game_name`: a string literal used in the initialization log message
///
/// The `levels` variant additionally exports `game_load_levels(json)`, which
/// forwards to an inherent `fn load_levels(&mut self, json: &str) -> Result<(), E>`
/// where `E: Display`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::error!("{}: not initialized, call game_init() first", $game_name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init(seed: f64) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new(seed as u64);
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_blur() {
            with_runner(|r| r.release_keys());
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_event_floats() -> u32 {
            with_runner(|r| r.event_floats()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_camera_scroll_x() -> f32 {
            with_runner(|r| r.camera_scroll_x()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_view_width() -> f32 {
            with_runner(|r| r.view_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_view_height() -> f32 {
            with_runner(|r| r.view_height()).unwrap_or(0.0)
        }
    };

    // Variant accepting a JSON level table from the page
    ($game_type:ty, $game_name:literal, levels) => {
        $crate::export_game!($game_type, $game_name);

        /// Returns false (and logs why) when the table is rejected.
        #[wasm_bindgen]
        pub fn game_load_levels(json: &str) -> bool {
            with_runner(|r| match r.game_mut().load_levels(json) {
                Ok(()) => true,
                Err(err) => {
                    log::error!("{}: rejected level table: {}", $game_name, err);
                    false
                }
            })
            .unwrap_or(false)
        }
    };
}
