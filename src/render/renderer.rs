use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::color::{ColorReading, hex_to_rgb};
use crate::popup::{CONTEXT_MENU_ENTRY, ContextMenu, Focus, PopupState, ToastKind};
use crate::theme::Theme;

const PICKING_BANNER: &str = "Pipette active: click anywhere to select a color...";
const SWATCH_WIDTH: u16 = 10;
const SWATCH_HEIGHT: u16 = 5;
const LISTS_TOP: u16 = 10;

pub struct Renderer {
    pub width: u16,
    pub height: u16,
}

impl Renderer {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self { width, height })
    }

    pub fn setup() -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn teardown() -> io::Result<()> {
        execute!(
            stdout(),
            DisableMouseCapture,
            Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn render(&self, state: &PopupState, theme: &Theme, help: &str) -> io::Result<()> {
        let mut stdout = stdout();

        queue!(stdout, Hide)?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        queue!(stdout, Clear(ClearType::All))?;

        self.render_title(&mut stdout, theme)?;
        self.render_buttons(&mut stdout, state, theme)?;
        self.render_reading(&mut stdout, state.display.as_ref(), theme)?;

        let half = self.width / 2;
        self.render_list(
            &mut stdout,
            ListView {
                title: "History",
                placeholder: "No history yet.",
                colors: &state.history,
                focused: state.focus == Focus::History,
                selected: state.selected,
                x: 2,
                width: half.saturating_sub(3),
            },
            theme,
        )?;
        self.render_list(
            &mut stdout,
            ListView {
                title: "Saved Colors",
                placeholder: "No saved colors yet.",
                colors: &state.favorites,
                focused: state.focus == Focus::Favorites,
                selected: state.selected,
                x: half + 1,
                width: self.width.saturating_sub(half + 2),
            },
            theme,
        )?;

        self.render_status_line(&mut stdout, state, theme, help)?;

        if let Some(menu) = state.context_menu {
            self.render_context_menu(&mut stdout, menu, theme)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_title(&self, stdout: &mut impl Write, theme: &Theme) -> io::Result<()> {
        queue!(stdout, MoveTo(2, 0))?;
        queue!(stdout, SetForegroundColor(theme.accent.to_crossterm()))?;
        queue!(stdout, SetAttribute(Attribute::Bold))?;
        queue!(stdout, Print("Pipette"))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        queue!(stdout, SetForegroundColor(theme.border.to_crossterm()))?;
        queue!(stdout, MoveTo(0, 1))?;
        queue!(stdout, Print("─".repeat(self.width as usize)))?;
        Ok(())
    }

    fn render_buttons(
        &self,
        stdout: &mut impl Write,
        state: &PopupState,
        theme: &Theme,
    ) -> io::Result<()> {
        queue!(stdout, MoveTo(2, 2))?;

        if state.picking {
            queue!(stdout, SetForegroundColor(theme.accent.to_crossterm()))?;
            queue!(stdout, SetAttribute(Attribute::Bold))?;
            queue!(stdout, Print(fit(PICKING_BANNER, self.width.saturating_sub(4))))?;
            queue!(stdout, SetAttribute(Attribute::Reset))?;
            queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
            return Ok(());
        }

        let pick_focused = state.focus == Focus::PickButton;
        let (bg, fg) = if pick_focused {
            (theme.button_fg, theme.button_bg)
        } else {
            (theme.button_bg, theme.button_fg)
        };
        queue!(stdout, SetBackgroundColor(bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(fg.to_crossterm()))?;
        queue!(stdout, Print(" Pick Color "))?;

        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        queue!(stdout, Print("  "))?;

        queue!(stdout, SetBackgroundColor(theme.button_bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(theme.button_fg.to_crossterm()))?;
        queue!(stdout, Print(" Save "))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }

    fn render_reading(
        &self,
        stdout: &mut impl Write,
        reading: Option<&ColorReading>,
        theme: &Theme,
    ) -> io::Result<()> {
        let top = 4;

        let Some(reading) = reading else {
            queue!(stdout, MoveTo(2, top + SWATCH_HEIGHT / 2))?;
            queue!(stdout, SetForegroundColor(theme.muted.to_crossterm()))?;
            queue!(stdout, Print("No color picked yet."))?;
            return Ok(());
        };

        let swatch = reading.swatch();
        queue!(stdout, SetBackgroundColor(swatch.to_crossterm()))?;
        for row in 0..SWATCH_HEIGHT {
            queue!(stdout, MoveTo(2, top + row))?;
            queue!(stdout, Print(" ".repeat(SWATCH_WIDTH as usize)))?;
        }
        queue!(stdout, MoveTo(3, top + SWATCH_HEIGHT / 2))?;
        queue!(stdout, SetForegroundColor(swatch.contrast_text().to_crossterm()))?;
        queue!(stdout, Print(fit(&reading.hex, SWATCH_WIDTH - 2)))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        let info_x = 2 + SWATCH_WIDTH + 2;
        let info_width = self.width.saturating_sub(info_x + 1);
        let rows = [
            ("HEX ", reading.hex.as_str()),
            ("RGB ", reading.rgb.as_str()),
            ("HSL ", reading.hsl.as_str()),
            ("Name", reading.name.as_str()),
        ];
        for (i, (label, value)) in rows.iter().enumerate() {
            queue!(stdout, MoveTo(info_x, top + i as u16))?;
            queue!(stdout, SetForegroundColor(theme.muted.to_crossterm()))?;
            queue!(stdout, Print(label))?;
            queue!(stdout, SetForegroundColor(theme.foreground.to_crossterm()))?;
            queue!(stdout, Print(" "))?;
            queue!(stdout, Print(fit(value, info_width.saturating_sub(5))))?;
        }
        Ok(())
    }

    fn render_list(&self, stdout: &mut impl Write, view: ListView, theme: &Theme) -> io::Result<()> {
        let header_color = if view.focused {
            theme.accent
        } else {
            theme.foreground
        };
        queue!(stdout, MoveTo(view.x, LISTS_TOP))?;
        queue!(stdout, SetForegroundColor(header_color.to_crossterm()))?;
        queue!(stdout, SetAttribute(Attribute::Bold))?;
        queue!(stdout, Print(fit(view.title, view.width)))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        let first_row = LISTS_TOP + 1;
        if view.colors.is_empty() {
            queue!(stdout, MoveTo(view.x, first_row))?;
            queue!(stdout, SetForegroundColor(theme.muted.to_crossterm()))?;
            queue!(stdout, Print(fit(view.placeholder, view.width)))?;
            return Ok(());
        }

        // Keep one row for the status line
        let visible = self.height.saturating_sub(first_row + 1) as usize;
        let offset = scroll_offset(view.selected, visible, view.focused);

        for (row, (index, hex)) in view
            .colors
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let y = first_row + row as u16;
            queue!(stdout, MoveTo(view.x, y))?;

            let chip = hex_to_rgb(hex);
            queue!(stdout, SetForegroundColor(chip.to_crossterm()))?;
            queue!(stdout, Print("██ "))?;

            let is_selected = view.focused && index == view.selected;
            if is_selected {
                queue!(stdout, SetBackgroundColor(theme.selection.to_crossterm()))?;
            }
            queue!(stdout, SetForegroundColor(theme.foreground.to_crossterm()))?;
            queue!(stdout, Print(fit(hex, view.width.saturating_sub(3))))?;
            queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        }
        Ok(())
    }

    fn render_status_line(
        &self,
        stdout: &mut impl Write,
        state: &PopupState,
        theme: &Theme,
        help: &str,
    ) -> io::Result<()> {
        let status_row = self.height.saturating_sub(1);
        queue!(stdout, MoveTo(0, status_row))?;

        match &state.toast {
            Some(active) => {
                let bg = match active.toast.kind {
                    ToastKind::Info => theme.toast_ok,
                    ToastKind::Error => theme.toast_error,
                };
                queue!(stdout, SetBackgroundColor(bg.to_crossterm()))?;
                queue!(stdout, SetForegroundColor(theme.toast_fg.to_crossterm()))?;
                let text = format!(" {}", active.toast.message);
                queue!(stdout, Print(fit(&text, self.width)))?;
            }
            None => {
                queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
                queue!(stdout, SetForegroundColor(theme.muted.to_crossterm()))?;
                let text = format!(" {help}");
                queue!(stdout, Print(fit(&text, self.width)))?;
            }
        }
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }

    fn render_context_menu(
        &self,
        stdout: &mut impl Write,
        menu: ContextMenu,
        theme: &Theme,
    ) -> io::Result<()> {
        let inner = (ContextMenu::WIDTH - 2) as usize;
        queue!(stdout, SetBackgroundColor(theme.menu_bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(theme.border.to_crossterm()))?;

        queue!(stdout, MoveTo(menu.column, menu.row))?;
        queue!(stdout, Print(format!("╭{}╮", "─".repeat(inner))))?;

        queue!(stdout, MoveTo(menu.column, menu.row + 1))?;
        queue!(stdout, Print("│"))?;
        queue!(stdout, SetForegroundColor(theme.menu_fg.to_crossterm()))?;
        queue!(stdout, Print(format!(" {CONTEXT_MENU_ENTRY} ")))?;
        queue!(stdout, SetForegroundColor(theme.border.to_crossterm()))?;
        queue!(stdout, Print("│"))?;

        queue!(stdout, MoveTo(menu.column, menu.row + 2))?;
        queue!(stdout, Print(format!("╰{}╯", "─".repeat(inner))))?;

        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }
}

struct ListView<'a> {
    title: &'a str,
    placeholder: &'a str,
    colors: &'a [String],
    focused: bool,
    selected: usize,
    x: u16,
    width: u16,
}

/// Pad or truncate to exactly `width` columns
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    if len < width {
        out.push_str(&" ".repeat(width - len));
    }
    out
}

/// First visible entry so that the selection stays on screen
fn scroll_offset(selected: usize, visible: usize, focused: bool) -> usize {
    if !focused || visible == 0 || selected < visible {
        return 0;
    }
    selected + 1 - visible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(2, 5, true), 0);
        assert_eq!(scroll_offset(7, 5, true), 3);
        assert_eq!(scroll_offset(7, 5, false), 0);
        assert_eq!(scroll_offset(7, 0, true), 0);
    }
}
