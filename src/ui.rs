use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    clock::Clock,
    session::CharState,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const PLACEHOLDER: &str = "type here";

impl<C: Clock, R: Rng> Widget for &App<C, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.controller;
        let target = controller.target();

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let sentence_lines = if target.width() <= max_chars_per_line as usize {
            1
        } else {
            (target.width() as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(2),              // title
                Constraint::Length(sentence_lines), // sentence
                Constraint::Length(1),              // timer
                Constraint::Length(3),              // input field
                Constraint::Length(2),              // result
                Constraint::Length(1),              // legend
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Span::styled("typing practice", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let spans = target
            .chars()
            .zip(controller.diff())
            .map(|(c, state)| match state {
                CharState::Correct => Span::styled(c.to_string(), green_bold_style),
                CharState::Incorrect => Span::styled(
                    match c {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                CharState::Current => Span::styled(c.to_string(), underlined_dim_bold_style),
                CharState::Pending => Span::styled(c.to_string(), dim_bold_style),
            })
            .collect::<Vec<Span>>();

        Paragraph::new(Line::from(spans))
            .alignment(if sentence_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        if let Some(elapsed) = controller.live_elapsed() {
            Paragraph::new(Span::styled(
                format!("{:.1}s", elapsed.as_secs_f64()),
                dim_bold_style,
            ))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        }

        let (field_text, field_style) = if self.field().is_empty() {
            (PLACEHOLDER, italic_style.add_modifier(Modifier::DIM))
        } else {
            (self.field(), Style::default())
        };
        let field_border = match self.state() {
            AppState::Typing => Style::default(),
            AppState::Results => Style::default().add_modifier(Modifier::DIM),
        };
        Paragraph::new(Span::styled(field_text, field_style))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(field_border),
            )
            .render(chunks[4], buf);

        let legend = match self.state() {
            AppState::Typing => "(tab) new sentence / (esc)ape",
            AppState::Results => {
                let result = vec![
                    Line::from(Span::styled("Done!", green_bold_style)),
                    Line::from(Span::styled(
                        format!("{} chars/min", controller.compute_speed()),
                        bold_style,
                    )),
                ];
                Paragraph::new(result)
                    .alignment(Alignment::Center)
                    .render(chunks[5], buf);

                "(r)etry / (esc)ape"
            }
        };

        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::runtime::TypistEvent;
    use crate::sentences::SentenceSet;
    use crate::session::Controller;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Duration;

    fn create_test_app<'a>(clock: &'a ManualClock, target: &str) -> App<&'a ManualClock> {
        let set = SentenceSet::new("test", vec![target.to_string()]).unwrap();
        App::new(Controller::with_parts(set, clock, StdRng::seed_from_u64(0)))
    }

    fn type_str(app: &mut App<&ManualClock>, s: &str) {
        for c in s.chars() {
            app.handle_event(TypistEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )));
        }
    }

    fn render(app: &App<&ManualClock>, area: Rect) -> Buffer {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn rendered_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn find(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
        let area = buffer.area();
        for y in area.top()..area.bottom() {
            let row: String = (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            if let Some(byte_idx) = row.find(needle) {
                let x = row[..byte_idx].chars().count() as u16;
                return Some((area.left() + x, y));
            }
        }
        None
    }

    #[test]
    fn test_renders_sentence_and_placeholder() {
        let clock = ManualClock::new();
        let app = create_test_app(&clock, "hello world");
        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        let text = rendered_text(&buffer);

        assert!(text.contains("hello world"));
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains("(tab) new sentence"));
        assert!(!text.contains("Done!"));
    }

    #[test]
    fn test_diff_styles() {
        let clock = ManualClock::new();
        let mut app = create_test_app(&clock, "abcd");
        type_str(&mut app, "ax");

        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        let (x, y) = find(&buffer, "abcd").unwrap();

        assert_eq!(buffer[(x, y)].fg, Color::Green);
        assert_eq!(buffer[(x + 1, y)].fg, Color::Red);
        assert!(buffer[(x + 2, y)].modifier.contains(Modifier::UNDERLINED));
        assert!(buffer[(x + 3, y)].modifier.contains(Modifier::DIM));
        assert!(!buffer[(x + 3, y)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_incorrect_space_is_visible() {
        let clock = ManualClock::new();
        let mut app = create_test_app(&clock, "a b");
        type_str(&mut app, "ax");

        let text = rendered_text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(text.contains("a·b"));
    }

    #[test]
    fn test_results_show_speed() {
        let clock = ManualClock::new();
        let mut app = create_test_app(&clock, "ab");
        type_str(&mut app, "a");
        clock.advance(Duration::from_secs(1));
        type_str(&mut app, "b");

        let text = rendered_text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(text.contains("Done!"));
        assert!(text.contains("120 chars/min"));
        assert!(text.contains("(r)etry / (esc)ape"));
        assert!(text.contains("1.0s"));
    }

    #[test]
    fn test_timer_hidden_before_first_key() {
        let clock = ManualClock::new();
        let app = create_test_app(&clock, "ab");

        let text = rendered_text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(!text.contains("0.0s"));
    }

    #[test]
    fn test_wide_sentence_renders() {
        let clock = ManualClock::new();
        let app = create_test_app(&clock, "こんにちは世界");

        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        assert!(find(&buffer, "こ").is_some());
    }

    #[test]
    fn test_small_area() {
        let clock = ManualClock::new();
        let app = create_test_app(&clock, "a long sentence that has to wrap somewhere");

        let area = Rect::new(0, 0, 20, 5);
        let buffer = render(&app, area);
        assert_eq!(*buffer.area(), area);
    }
}
