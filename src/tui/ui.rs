//! UI rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::computer::InstructionStore;
use crate::storage::Bank;
use super::app::DebuggerApp;

/// Main draw function.
pub fn draw<R: Bank<14>, P: InstructionStore>(frame: &mut Frame, app: &DebuggerApp<R, P>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(frame.area());

    // Left side: code, registers and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_disassembly(frame, left_chunks[0], app);
    draw_registers(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: screen or RAM, and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(chunks[1]);

    if app.show_screen {
        draw_screen(frame, right_chunks[0], app);
    } else {
        draw_memory(frame, right_chunks[0], app);
    }
    draw_help(frame, right_chunks[1], app.running);
}

fn draw_disassembly<R: Bank<14>, P: InstructionStore>(frame: &mut Frame, area: Rect, app: &DebuggerApp<R, P>) {
    let disasm = app.get_disassembly((area.height as usize).saturating_sub(2));

    let items: Vec<ListItem> = disasm
        .iter()
        .map(|(addr, instr, is_current)| {
            let prefix = if *is_current { "▶ " } else { "  " };
            let bp = if app.breakpoints.contains(addr) { "●" } else { " " };
            let text = format!("{}{:05}: {}", prefix, addr, instr);

            let style = if *is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if app.breakpoints.contains(addr) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            ListItem::new(format!("{} {}", bp, text)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Disassembly ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

fn draw_registers<R: Bank<14>, P: InstructionStore>(frame: &mut Frame, area: Rect, app: &DebuggerApp<R, P>) {
    let regs = app.computer.registers();
    let value = Style::default().fg(Color::White);

    let content = vec![
        Line::from(vec![
            Span::raw("A: "),
            Span::styled(format!("{}", regs.a), value),
            Span::raw(format!(" = {}", regs.a.to_i16())),
        ]),
        Line::from(vec![
            Span::raw("D: "),
            Span::styled(format!("{}", regs.d), value),
            Span::raw(format!(" = {}", regs.d.to_i16())),
        ]),
        Line::from(vec![
            Span::raw("PC: "),
            Span::styled(format!("{}", app.computer.pc()), Style::default().fg(Color::Yellow)),
            Span::raw("   addressM: "),
            Span::styled(format!("{}", app.computer.address_m()), value),
        ]),
        Line::from(vec![
            Span::raw("Steps: "),
            Span::styled(format!("{}", app.computer.steps()), Style::default().fg(Color::Cyan)),
            Span::raw("   State: "),
            if app.running {
                Span::styled("running", Style::default().fg(Color::Green))
            } else {
                Span::styled("paused", Style::default().fg(Color::Red))
            },
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

fn draw_memory<R: Bank<14>, P: InstructionStore>(frame: &mut Frame, area: Rect, app: &DebuggerApp<R, P>) {
    let visible_rows = (area.height as usize).saturating_sub(2);
    let start = app.mem_scroll;
    let end = (start + visible_rows).min(0x8000);
    let address_m = app.computer.address_m() as usize;

    let items: Vec<ListItem> = (start..end)
        .map(|addr| {
            let word = app.computer.peek(addr as u16);
            let text = format!("{:05}: {} = {}", addr, word, word.to_i16());

            let style = if addr == address_m {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if !word.is_zero() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

fn draw_screen<R: Bank<14>, P: InstructionStore>(frame: &mut Frame, area: Rect, app: &DebuggerApp<R, P>) {
    let lines: Vec<Line> = app.computer.memory().screen()
        .render_braille()
        .into_iter()
        .map(Line::from)
        .collect();

    let screen = Paragraph::new(lines)
        .block(Block::default()
            .title(" Screen ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(screen, area);
}

fn draw_status<R: Bank<14>, P: InstructionStore>(frame: &mut Frame, area: Rect, app: &DebuggerApp<R, P>) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default()
            .title(" Status ")
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, area: Rect, running: bool) {
    let lines = if running {
        vec![
            Line::from("Keys go to the Hack keyboard."),
            Line::from("Ctrl-P: Pause  Ctrl-Q: Quit"),
        ]
    } else {
        vec![
            Line::from("s: Step  r: Run  b: Breakpoint  x: Reset"),
            Line::from("v: Screen/RAM  ↑↓ PgUp PgDn: Scroll  q: Quit"),
        ]
    };

    let help = Paragraph::new(lines)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default()
            .title(" Help ")
            .borders(Borders::ALL));

    frame.render_widget(help, area);
}
