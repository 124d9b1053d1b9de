//! Foreground window classification
//!
//! Decides whether the focused window is the desktop, an ordinary
//! application or a fullscreen game. A window counts as fullscreen only when
//! its rectangle matches the primary desktop rectangle on all four edges;
//! a fullscreen window on a secondary monitor stays Ordinary.

use std::rc::Rc;

use tracing::{debug, info};
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};

use crate::motion::Rect;
use crate::x11::X11Connection;
use crate::JoyCursorError;

/// Window identity
pub type WindowId = u32;

/// Class of the window that hosts the desktop wallpaper
pub const WALLPAPER_HOST_CLASS: &str = "WorkerW";

/// Class names are compared after truncation to this many characters
pub const CLASS_NAME_MAX: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForegroundVerdict {
    Desktop,
    Ordinary,
    FullscreenGame,
}

/// The two windows that identify "the desktop", captured once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopAnchors {
    /// Root window
    pub shell: WindowId,
    /// Desktop icon layer, when a file manager provides one
    pub program_manager: Option<WindowId>,
}

impl DesktopAnchors {
    pub fn contains(&self, window: WindowId) -> bool {
        window == self.shell || self.program_manager == Some(window)
    }
}

/// Trait for window system queries
pub trait WindowSystem {
    /// Currently focused window, `None` if nothing is focused
    fn foreground_window(&self) -> Option<WindowId>;

    /// Window class name
    fn class_name(&self, window: WindowId) -> Option<String>;

    /// Bounding rectangle in screen coordinates
    fn window_rect(&self, window: WindowId) -> Option<Rect>;

    /// Live bounding rectangle of the primary desktop
    fn desktop_rect(&self) -> Option<Rect>;

    /// Find the desktop anchor windows
    fn desktop_anchors(&self) -> DesktopAnchors;
}

/// Cut a class name to [`CLASS_NAME_MAX`] characters
pub fn truncate_class_name(name: &str) -> &str {
    match name.char_indices().nth(CLASS_NAME_MAX) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}

/// Classify the current foreground window. First match wins:
///
/// 1. a desktop anchor is Desktop
/// 2. the wallpaper host class is Desktop
/// 3. an exact match with the desktop rectangle is FullscreenGame
/// 4. anything else, including failed queries, is Ordinary
pub fn classify<W: WindowSystem>(windows: &W, anchors: &DesktopAnchors) -> ForegroundVerdict {
    let Some(window) = windows.foreground_window() else {
        return ForegroundVerdict::Ordinary;
    };

    if anchors.contains(window) {
        return ForegroundVerdict::Desktop;
    }

    let class = windows.class_name(window).unwrap_or_default();
    if truncate_class_name(&class) == WALLPAPER_HOST_CLASS {
        return ForegroundVerdict::Desktop;
    }

    let Some(rect) = windows.window_rect(window) else {
        debug!("Window {:#x} rectangle unavailable", window);
        return ForegroundVerdict::Ordinary;
    };
    let Some(desktop) = windows.desktop_rect() else {
        return ForegroundVerdict::Ordinary;
    };

    if rect == desktop {
        debug!(
            "Window {:#x} ({}) covers the desktop {:?}",
            window, class, rect
        );
        ForegroundVerdict::FullscreenGame
    } else {
        ForegroundVerdict::Ordinary
    }
}

/// X11-based window system using EWMH properties
pub struct X11WindowSystem {
    x11: Rc<X11Connection>,
}

impl X11WindowSystem {
    pub fn new(x11: Rc<X11Connection>) -> Self {
        Self { x11 }
    }

    fn window_property(
        &self,
        window: Window,
        property: u32,
        kind: AtomEnum,
    ) -> Option<Vec<u32>> {
        let reply = self
            .x11
            .conn
            .get_property(false, window, property, kind, 0, 1024)
            .ok()?
            .reply()
            .ok()?;
        let values = reply.value32()?.collect();
        Some(values)
    }

    fn is_desktop_type(&self, window: Window) -> bool {
        let atoms = &self.x11.atoms;
        self.window_property(window, atoms.net_wm_window_type, AtomEnum::ATOM)
            .is_some_and(|types| types.contains(&atoms.net_wm_window_type_desktop))
    }

    /// Find the program manager window, or report why the client list is unusable
    pub fn find_program_manager(&self) -> Result<Option<WindowId>, JoyCursorError> {
        let clients = self
            .window_property(
                self.x11.root,
                self.x11.atoms.net_client_list,
                AtomEnum::WINDOW,
            )
            .ok_or_else(|| {
                JoyCursorError::FocusDetection("_NET_CLIENT_LIST unavailable".to_string())
            })?;
        Ok(clients.into_iter().find(|&w| self.is_desktop_type(w)))
    }
}

impl WindowSystem for X11WindowSystem {
    fn foreground_window(&self) -> Option<WindowId> {
        let active = self
            .window_property(
                self.x11.root,
                self.x11.atoms.net_active_window,
                AtomEnum::WINDOW,
            )
            .and_then(|value| value.first().copied());

        let window = match active {
            Some(window) => window,
            // No EWMH window manager, fall back to the input focus
            None => self.x11.conn.get_input_focus().ok()?.reply().ok()?.focus,
        };

        (window != 0).then_some(window)
    }

    fn class_name(&self, window: WindowId) -> Option<String> {
        let reply = self
            .x11
            .conn
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 64)
            .ok()?
            .reply()
            .ok()?;

        // WM_CLASS is "instance\0class\0"
        let class = reply.value.split(|&b| b == 0).nth(1)?;
        Some(String::from_utf8_lossy(class).into_owned())
    }

    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        let conn = &self.x11.conn;
        let geometry = conn.get_geometry(window).ok()?.reply().ok()?;
        let origin = conn
            .translate_coordinates(window, self.x11.root, 0, 0)
            .ok()?
            .reply()
            .ok()?;

        let left = i32::from(origin.dst_x);
        let top = i32::from(origin.dst_y);
        Some(Rect::new(
            left,
            top,
            left + i32::from(geometry.width),
            top + i32::from(geometry.height),
        ))
    }

    fn desktop_rect(&self) -> Option<Rect> {
        let geometry = self
            .x11
            .conn
            .get_geometry(self.x11.root)
            .ok()?
            .reply()
            .ok()?;
        Some(Rect::new(0, 0, i32::from(geometry.width), i32::from(geometry.height)))
    }

    fn desktop_anchors(&self) -> DesktopAnchors {
        let program_manager = match self.find_program_manager() {
            Ok(found) => found,
            Err(e) => {
                info!("{}, only the root window anchors the desktop", e);
                None
            }
        };
        if let Some(window) = program_manager {
            info!("Desktop window found: {:#x}", window);
        }

        DesktopAnchors {
            shell: self.x11.root,
            program_manager,
        }
    }
}
