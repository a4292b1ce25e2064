//! Editor core performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{Criterion, criterion_group, criterion_main};
use richtext_core::{
    Command, Editor, EditorOptions, InlineFormat, Position, Selection, markup,
};
use std::hint::black_box;

fn sample_markup(paragraphs: usize) -> String {
    let mut out = String::new();
    for i in 0..paragraphs {
        out.push_str("<p>Paragraph ");
        out.push_str(&i.to_string());
        out.push_str(" with <strong>bold</strong> and <em>italic</em> runs ");
        out.push_str("and a <a href=\"https://example.com/page\">link</a>.</p>");
    }
    out
}

fn editor_with(markup_src: &str) -> Editor {
    Editor::new(EditorOptions {
        initial_markup: markup_src.to_string(),
        placeholder: None,
    })
}

fn markup_parse(c: &mut Criterion) {
    let small = sample_markup(5);
    c.bench_function("parse_5_paragraphs", |b| {
        b.iter(|| markup::parse(black_box(&small)));
    });

    let large = sample_markup(200);
    c.bench_function("parse_200_paragraphs", |b| {
        b.iter(|| markup::parse(black_box(&large)));
    });

    let soup = "<div><span>x</span></div>".repeat(100);
    c.bench_function("parse_unsupported_soup", |b| {
        b.iter(|| markup::parse(black_box(&soup)));
    });
}

fn markup_write(c: &mut Criterion) {
    let (blocks, hrefs) = markup::parse(&sample_markup(200));
    c.bench_function("write_200_paragraphs", |b| {
        b.iter(|| markup::write(black_box(&blocks), black_box(&hrefs)));
    });
}

fn editing_ops(c: &mut Criterion) {
    c.bench_function("insert_char_stream", |b| {
        let mut ed = editor_with("<p></p>");
        b.iter(|| {
            ed.dispatch(Command::InsertText(black_box("x").to_string()));
        });
    });

    c.bench_function("toggle_bold_across_document", |b| {
        let mut ed = editor_with(&sample_markup(50));
        ed.set_selection(Selection::new(Position::new(0, 0), Position::new(49, 10)));
        b.iter(|| {
            ed.dispatch(Command::ToggleBold);
        });
    });

    c.bench_function("active_formats_query", |b| {
        let mut ed = editor_with(&sample_markup(50));
        ed.set_selection(Selection::new(Position::new(0, 0), Position::new(49, 10)));
        b.iter(|| black_box(ed.active_formats()));
    });
}

fn history_ops(c: &mut Criterion) {
    c.bench_function("undo_redo_cycle_50_paragraphs", |b| {
        let mut ed = editor_with(&sample_markup(50));
        ed.set_selection(Selection::caret(Position::new(0, 0)));
        ed.dispatch(Command::InsertText("edit".to_string()));
        b.iter(|| {
            ed.dispatch(Command::Undo);
            ed.dispatch(Command::Redo);
        });
    });

    c.bench_function("snapshot_record_cost", |b| {
        let mut ed = editor_with(&sample_markup(50));
        ed.set_selection(Selection::caret(Position::new(0, 0)));
        b.iter(|| {
            ed.dispatch(Command::InsertText(black_box("y").to_string()));
        });
    });
}

fn format_flags(c: &mut Criterion) {
    c.bench_function("inline_format_href_packing", |b| {
        b.iter(|| {
            let fmt = InlineFormat::BOLD.with_href_id(black_box(12345));
            black_box(fmt.href_id())
        });
    });
}

criterion_group!(
    benches,
    markup_parse,
    markup_write,
    editing_ops,
    history_ops,
    format_flags
);
criterion_main!(benches);
