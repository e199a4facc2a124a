// Kotoba Crossword – A vocabulary crossword game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::sync::Once;

static INIT: Once = Once::new();

/// Sets up logging to stderr for the command line tools or to the
/// browser console for the web version. `RUST_LOG` overrides the
/// level on native builds. Only the first call has any effect.
pub fn init_logger(debug_enabled: bool) {
    INIT.call_once(|| install_logger(debug_enabled));
}

#[cfg(target_arch = "wasm32")]
fn install_logger(debug_enabled: bool) {
    let level = if debug_enabled {
        log::Level::Debug
    } else {
        log::Level::Info
    };

    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::error_1(
            &format!("failed to set up logging: {}", e).into(),
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install_logger(debug_enabled: bool) {
    let level = if debug_enabled {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_err() {
        eprintln!("a logger was already installed");
    }
}
