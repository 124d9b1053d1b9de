//! Shared X11 connection
//!
//! Works for both native X11 and XWayland sessions.

use std::rc::Rc;

use tracing::info;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use crate::JoyCursorError;

/// Atoms interned once at startup
#[derive(Debug, Clone, Copy)]
pub struct Atoms {
    pub net_active_window: Atom,
    pub net_client_list: Atom,
    pub net_wm_window_type: Atom,
    pub net_wm_window_type_desktop: Atom,
}

/// Connection plus the root window of the default screen
pub struct X11Connection {
    pub conn: RustConnection,
    pub root: Window,
    pub atoms: Atoms,
}

impl X11Connection {
    /// Connect to the display named by `$DISPLAY`
    pub fn connect() -> Result<Rc<Self>, JoyCursorError> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| JoyCursorError::Display(format!("Failed to connect to X11: {}", e)))?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        info!(
            "Connected to X11 screen {} ({}x{})",
            screen_num, screen.width_in_pixels, screen.height_in_pixels
        );

        let atoms = Atoms {
            net_active_window: intern(&conn, b"_NET_ACTIVE_WINDOW")?,
            net_client_list: intern(&conn, b"_NET_CLIENT_LIST")?,
            net_wm_window_type: intern(&conn, b"_NET_WM_WINDOW_TYPE")?,
            net_wm_window_type_desktop: intern(&conn, b"_NET_WM_WINDOW_TYPE_DESKTOP")?,
        };

        Ok(Rc::new(Self { conn, root, atoms }))
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom, JoyCursorError> {
    let reply = conn
        .intern_atom(false, name)
        .map_err(|e| JoyCursorError::Display(e.to_string()))?
        .reply()
        .map_err(|e| JoyCursorError::Display(e.to_string()))?;
    Ok(reply.atom)
}
