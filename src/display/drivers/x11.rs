//! Xlib driver: one fixed-size window the size of the world.
//!
//! Only the events `Input` folds are selected: keys, buttons, pointer motion
//! and the window manager's close message. Frames are presented one dirty
//! rectangle at a time with `XPutImage`.

use crate::display::driver::DisplayDriver;
use crate::display::messages::{
    DisplayError, DisplayEvent, DriverRequest, DriverResponse, FrameSnapshot,
};
use crate::geometry::Rect;
use crate::image::Image;
use crate::keys::{KeySymbol, Modifiers};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, trace};
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_long, c_uint, c_ulong};
use std::ptr;
use x11::keysym::*;
use x11::xlib::*;

const INPUT_MASK: c_long =
    KeyPressMask | KeyReleaseMask | ButtonPressMask | ButtonReleaseMask | PointerMotionMask;

/// Keysyms with a name of their own. Printable Latin-1 is handled apart.
const NAMED_KEYSYMS: &[(c_uint, KeySymbol)] = &[
    (XK_BackSpace, KeySymbol::Backspace),
    (XK_Tab, KeySymbol::Tab),
    (XK_Return, KeySymbol::Enter),
    (XK_KP_Enter, KeySymbol::Enter),
    (XK_Escape, KeySymbol::Escape),
    (XK_Delete, KeySymbol::Delete),
    (XK_Insert, KeySymbol::Insert),
    (XK_Home, KeySymbol::Home),
    (XK_End, KeySymbol::End),
    (XK_Page_Up, KeySymbol::PageUp),
    (XK_Page_Down, KeySymbol::PageDown),
    (XK_Left, KeySymbol::Left),
    (XK_Right, KeySymbol::Right),
    (XK_Up, KeySymbol::Up),
    (XK_Down, KeySymbol::Down),
    (XK_Shift_L, KeySymbol::Shift),
    (XK_Shift_R, KeySymbol::Shift),
    (XK_Control_L, KeySymbol::Control),
    (XK_Control_R, KeySymbol::Control),
    (XK_Alt_L, KeySymbol::Alt),
    (XK_Alt_R, KeySymbol::Alt),
    (XK_Super_L, KeySymbol::Super),
    (XK_Super_R, KeySymbol::Super),
];

const MODIFIER_MASKS: [(c_uint, Modifiers); 4] = [
    (ShiftMask, Modifiers::SHIFT),
    (ControlMask, Modifiers::CONTROL),
    (Mod1Mask, Modifiers::ALT),
    (Mod4Mask, Modifiers::SUPER),
];

pub struct X11DisplayDriver {
    display: *mut Display,
    window: Window,
    gc: GC,
    visual: *mut Visual,
    close_atom: Atom,
    mapped: bool,
    /// BGRA bytes of the rectangle being put.
    staging: Vec<u8>,
}

impl DisplayDriver for X11DisplayDriver {
    fn new() -> Result<Self> {
        unsafe {
            let display = XOpenDisplay(ptr::null());
            if display.is_null() {
                return Err(anyhow!("cannot open X display; is DISPLAY set?"));
            }
            let screen = XDefaultScreen(display);

            // 1x1 until Init resizes it to the world.
            let window = XCreateSimpleWindow(
                display,
                XRootWindow(display, screen),
                0,
                0,
                1,
                1,
                0,
                XBlackPixel(display, screen),
                XWhitePixel(display, screen),
            );
            if window == 0 {
                XCloseDisplay(display);
                return Err(anyhow!("XCreateSimpleWindow failed"));
            }
            XSelectInput(display, window, INPUT_MASK);

            let mut close_atom =
                XInternAtom(display, b"WM_DELETE_WINDOW\0".as_ptr() as *const c_char, False);
            XSetWMProtocols(display, window, &mut close_atom, 1);

            debug!("X11DisplayDriver: window {:#x} on screen {}", window, screen);
            Ok(Self {
                display,
                window,
                gc: XCreateGC(display, window, 0, ptr::null_mut()),
                visual: XDefaultVisual(display, screen),
                close_atom,
                mapped: false,
                staging: Vec::new(),
            })
        }
    }

    fn handle_request(
        &mut self,
        request: DriverRequest,
    ) -> std::result::Result<DriverResponse, DisplayError> {
        match request {
            DriverRequest::Init {
                width_px,
                height_px,
                title,
            } => Ok(self.init_window(width_px, height_px, &title)?),
            DriverRequest::PollEvents => Ok(DriverResponse::Events(self.drain_events())),
            DriverRequest::Present(snapshot) => self.present(snapshot),
            DriverRequest::SetTitle(title) => {
                self.store_title(&title)?;
                Ok(DriverResponse::TitleSet)
            }
            DriverRequest::SetIcon(icon) => {
                self.store_icon(&icon);
                Ok(DriverResponse::IconSet)
            }
        }
    }
}

impl X11DisplayDriver {
    fn init_window(&mut self, width_px: u32, height_px: u32, title: &str) -> Result<DriverResponse> {
        let (w, h) = (width_px.max(1), height_px.max(1));
        unsafe {
            XResizeWindow(self.display, self.window, w, h);

            // Worlds do not resize, so neither does the window.
            let hints = XAllocSizeHints();
            if !hints.is_null() {
                (*hints).flags = PMinSize | PMaxSize;
                (*hints).min_width = w as c_int;
                (*hints).max_width = w as c_int;
                (*hints).min_height = h as c_int;
                (*hints).max_height = h as c_int;
                XSetWMNormalHints(self.display, self.window, hints);
                XFree(hints as *mut _);
            }

            if !self.mapped {
                XMapWindow(self.display, self.window);
                self.mapped = true;
            }
        }
        self.store_title(title).context("Failed to title the window")?;
        info!("X11DisplayDriver: window is {}x{} px", w, h);
        Ok(DriverResponse::InitComplete {
            width_px: w,
            height_px: h,
        })
    }

    fn drain_events(&mut self) -> Vec<DisplayEvent> {
        let mut events = Vec::new();
        unsafe {
            while XPending(self.display) > 0 {
                let mut event: XEvent = std::mem::zeroed();
                XNextEvent(self.display, &mut event);
                let converted = match event.get_type() {
                    KeyPress => Some(key_event(&mut event.key, true)),
                    KeyRelease => Some(key_event(&mut event.key, false)),
                    ButtonPress => Some(button_event(&event.button, true)),
                    ButtonRelease => Some(button_event(&event.button, false)),
                    MotionNotify => Some(DisplayEvent::MouseMove {
                        x: event.motion.x,
                        y: event.motion.y,
                        modifiers: modifiers_from_state(event.motion.state),
                    }),
                    ClientMessage
                        if event.client_message.data.get_long(0) as Atom == self.close_atom =>
                    {
                        Some(DisplayEvent::CloseRequested)
                    }
                    _ => None,
                };
                events.extend(converted);
            }
        }
        if !events.is_empty() {
            trace!("X11DisplayDriver: {} event(s)", events.len());
        }
        events
    }

    fn present(
        &mut self,
        snapshot: FrameSnapshot,
    ) -> std::result::Result<DriverResponse, DisplayError> {
        let bounds = snapshot.frame.bounds();
        let visible: Vec<Rect> = snapshot
            .dirty
            .iter()
            .filter_map(|r| r.clip_to(&bounds))
            .collect();
        trace!("X11DisplayDriver: putting {} rect(s)", visible.len());

        for rect in visible {
            if let Err(reason) = self.put_rect(&snapshot.frame, rect) {
                return Err(DisplayError::PresentationFailed(snapshot, reason));
            }
        }
        unsafe {
            XFlush(self.display);
        }
        Ok(DriverResponse::PresentComplete(snapshot))
    }

    /// Sends `rect` of `frame` to the window. `rect` lies inside the frame.
    fn put_rect(&mut self, frame: &Image, rect: Rect) -> std::result::Result<(), String> {
        let surface = frame.surface();
        self.staging.clear();
        for y in rect.y as u32..rect.bottom() as u32 {
            for x in rect.x as u32..rect.right() as u32 {
                let [r, g, b, a] = surface.get_pixel(x, y).0;
                self.staging.extend_from_slice(&[b, g, r, a]);
            }
        }

        unsafe {
            let ximage = XCreateImage(
                self.display,
                self.visual,
                24,
                ZPixmap,
                0,
                self.staging.as_mut_ptr() as *mut c_char,
                rect.width,
                rect.height,
                32,
                0,
            );
            if ximage.is_null() {
                return Err(format!("XCreateImage failed for {:?}", rect));
            }
            XPutImage(
                self.display,
                self.window,
                self.gc,
                ximage,
                0,
                0,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
            );
            // `staging` owns the pixels, not Xlib.
            (*ximage).data = ptr::null_mut();
            XDestroyImage(ximage);
        }
        Ok(())
    }

    fn store_title(&mut self, title: &str) -> Result<()> {
        let title = CString::new(title)?;
        unsafe {
            XStoreName(self.display, self.window, title.as_ptr());
            XFlush(self.display);
        }
        Ok(())
    }

    /// Sets `_NET_WM_ICON`: width, height, then one ARGB pixel per long.
    fn store_icon(&mut self, icon: &Image) {
        let (w, h) = icon.dimensions();
        let data: Vec<c_ulong> = [w as c_ulong, h as c_ulong]
            .into_iter()
            .chain(icon.surface().pixels().map(|px| {
                let [r, g, b, a] = px.0.map(c_ulong::from);
                (a << 24) | (r << 16) | (g << 8) | b
            }))
            .collect();
        unsafe {
            let property =
                XInternAtom(self.display, b"_NET_WM_ICON\0".as_ptr() as *const c_char, False);
            XChangeProperty(
                self.display,
                self.window,
                property,
                XA_CARDINAL,
                32,
                PropModeReplace,
                data.as_ptr() as *const u8,
                data.len() as c_int,
            );
            XFlush(self.display);
        }
    }
}

/// Converts a key press or release. Presses carry the typed text.
unsafe fn key_event(event: &mut XKeyEvent, pressed: bool) -> DisplayEvent {
    let symbol = symbol_for(XLookupKeysym(event, 0));
    let modifiers = modifiers_from_state(event.state);
    if !pressed {
        return DisplayEvent::KeyRelease { symbol, modifiers };
    }

    let mut typed = [0u8; 16];
    let len = XLookupString(
        event,
        typed.as_mut_ptr() as *mut c_char,
        typed.len() as c_int,
        ptr::null_mut(),
        ptr::null_mut(),
    );
    let text = usize::try_from(len)
        .ok()
        .filter(|&n| n > 0)
        .map(|n| String::from_utf8_lossy(&typed[..n]).into_owned());
    DisplayEvent::Key {
        symbol,
        modifiers,
        text,
    }
}

/// X numbers buttons from 1; `Input` numbers them from 0.
fn button_event(event: &XButtonEvent, pressed: bool) -> DisplayEvent {
    let button = u8::try_from(event.button.saturating_sub(1)).unwrap_or(u8::MAX);
    let (x, y) = (event.x, event.y);
    let modifiers = modifiers_from_state(event.state);
    if pressed {
        DisplayEvent::MouseButtonPress {
            button,
            x,
            y,
            modifiers,
        }
    } else {
        DisplayEvent::MouseButtonRelease {
            button,
            x,
            y,
            modifiers,
        }
    }
}

fn symbol_for(keysym: KeySym) -> KeySymbol {
    let Ok(code) = c_uint::try_from(keysym) else {
        return KeySymbol::Unknown;
    };
    if let Some((_, symbol)) = NAMED_KEYSYMS.iter().find(|(sym, _)| *sym == code) {
        return *symbol;
    }
    if (XK_F1..=XK_F12).contains(&code) {
        return KeySymbol::function(code - XK_F1 + 1).unwrap_or(KeySymbol::Unknown);
    }
    // Printable Latin-1 keysyms are their own code points.
    match u8::try_from(code) {
        Ok(byte) if (0x20..0x7f).contains(&byte) => {
            KeySymbol::Char(char::from(byte).to_ascii_lowercase())
        }
        _ => KeySymbol::Unknown,
    }
}

fn modifiers_from_state(state: c_uint) -> Modifiers {
    MODIFIER_MASKS
        .iter()
        .filter(|(mask, _)| state & mask != 0)
        .fold(Modifiers::empty(), |acc, (_, flag)| acc | *flag)
}

impl Drop for X11DisplayDriver {
    fn drop(&mut self) {
        if self.display.is_null() {
            return;
        }
        unsafe {
            if !self.gc.is_null() {
                XFreeGC(self.display, self.gc);
            }
            if self.window != 0 {
                XDestroyWindow(self.display, self.window);
            }
            XCloseDisplay(self.display);
        }
        debug!("X11DisplayDriver: display closed");
    }
}
