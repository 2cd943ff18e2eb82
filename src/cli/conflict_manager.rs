use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ledger::CommitSummary;
use crate::session::{BulkDecision, Decision, ResolutionSession};
use crate::tui::{
    money_span, wrap_text, Screen, ScreenAction, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE,
};

/// First wrapped line of a description, so one conflict stays three rows tall.
fn clipped(text: &str, width: usize) -> String {
    let (wrapped, _) = wrap_text(text, width.max(10));
    wrapped.lines().next().unwrap_or("").to_string()
}

enum Stage {
    Deciding,
    Done { message: String, is_error: bool },
}

/// Interactive resolution of import conflicts: one row pair per conflict,
/// per-conflict and bulk decisions, Esc abandons without touching the ledger.
pub struct ConflictScreen<'c> {
    session: ResolutionSession<'c>,
    selected: usize,
    stage: Stage,
    final_message: Option<String>,
}

impl<'c> ConflictScreen<'c> {
    pub fn new(session: ResolutionSession<'c>) -> Self {
        Self {
            session,
            selected: 0,
            stage: Stage::Deciding,
            final_message: None,
        }
    }

    /// Summary line to print after the terminal is restored.
    pub fn final_message(&self) -> Option<&str> {
        self.final_message.as_deref()
    }

    fn finish(&mut self, summary: CommitSummary) {
        let message = format!(
            "Import complete: {} appended, {} replaced.",
            summary.appended, summary.replaced
        );
        self.final_message = Some(message.clone());
        self.stage = Stage::Done {
            message,
            is_error: false,
        };
    }

    fn fail(&mut self, err: impl std::fmt::Display) {
        let message = format!("Import failed: {err}");
        self.final_message = Some(message.clone());
        self.stage = Stage::Done {
            message,
            is_error: true,
        };
    }

    fn decide(&mut self, decision: Decision) {
        if self.session.conflicts().is_empty() {
            return;
        }
        match self.session.resolve(self.selected, decision) {
            Ok(Some(summary)) => self.finish(summary),
            Ok(None) => {
                let remaining = self.session.conflicts().len();
                if self.selected >= remaining {
                    self.selected = remaining.saturating_sub(1);
                }
            }
            Err(e) => self.fail(e),
        }
    }

    fn decide_all(&mut self, decision: BulkDecision) {
        match self.session.resolve_all(decision) {
            Ok(summary) => self.finish(summary),
            Err(e) => self.fail(e),
        }
    }

    fn draw_list(&self, frame: &mut Frame, content: ratatui::layout::Rect) {
        let mut lines = vec![Line::from("")];

        // Three rendered lines per conflict; keep the selection visible.
        let per_conflict = 3usize;
        let visible = (content.height as usize / per_conflict).max(1);
        let first = self.selected.saturating_sub(visible.saturating_sub(1));

        let desc_width = (content.width as usize).saturating_sub(36);

        for (idx, conflict) in self.session.conflicts().iter().enumerate().skip(first).take(visible) {
            let is_selected = idx == self.selected;
            let marker = if is_selected { " > " } else { "   " };
            let row_style = if is_selected {
                SELECTED_STYLE
            } else {
                Style::default()
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{marker}existing  "), row_style),
                Span::raw(format!("{}  ", conflict.existing.date)),
                money_span(conflict.existing.amount),
                Span::raw(format!("  {}", clipped(&conflict.existing.description, desc_width))),
            ]));
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}incoming  "), row_style),
                Span::raw(format!("{}  ", conflict.candidate.date)),
                money_span(conflict.candidate.amount),
                Span::styled(
                    format!("  {}", clipped(&conflict.candidate.description, desc_width)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(""));
        }

        frame.render_widget(Paragraph::new(lines), content);
    }

    fn draw_result(&self, frame: &mut Frame, content: ratatui::layout::Rect, message: &str, is_error: bool) {
        let color = if is_error { Color::Red } else { Color::Green };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("   {message}"),
                Style::default().fg(color),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), content);
    }
}

impl Screen for ConflictScreen<'_> {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let title = format!(
            " Import Conflicts: {} unresolved, {} clean queued",
            self.session.conflicts().len(),
            self.session.clean_count(),
        );
        frame.render_widget(Paragraph::new(title).style(HEADER_STYLE), header_area);

        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        match &self.stage {
            Stage::Deciding => {
                self.draw_list(frame, content_area);
                frame.render_widget(
                    Paragraph::new(
                        " Up/Down=select  o=keep old  r=replace  b=keep both  O=keep all old  R=replace all  Esc=cancel",
                    )
                    .style(FOOTER_STYLE),
                    hints_area,
                );
            }
            Stage::Done { message, is_error } => {
                self.draw_result(frame, content_area, message, *is_error);
                frame.render_widget(
                    Paragraph::new(" Esc=close").style(FOOTER_STYLE),
                    hints_area,
                );
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> ScreenAction {
        match self.stage {
            Stage::Done { .. } => match code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => ScreenAction::Close,
                _ => ScreenAction::Continue,
            },
            Stage::Deciding => {
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        self.session.abandon();
                        self.final_message =
                            Some("Import cancelled. No changes were made.".to_string());
                        return ScreenAction::Close;
                    }
                    KeyCode::Up => {
                        self.selected = self.selected.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        let last = self.session.conflicts().len().saturating_sub(1);
                        self.selected = (self.selected + 1).min(last);
                    }
                    KeyCode::Char('o') => self.decide(Decision::KeepOld),
                    KeyCode::Char('r') => self.decide(Decision::Replace),
                    KeyCode::Char('b') => self.decide(Decision::KeepBoth),
                    KeyCode::Char('O') => self.decide_all(BulkDecision::KeepOld),
                    KeyCode::Char('R') => self.decide_all(BulkDecision::Replace),
                    _ => {}
                }
                ScreenAction::Continue
            }
        }
    }
}
