#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use passage_commonmark::{
  EngineMode,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
  SanitizeOverride,
  render_fallback,
  sanitize,
};

const DOC_SMALL: &str = "# Hello\n\nSome **bold** text and `code`.\n";

const DOC_LARGE: &str = r#"# Passage Guide

Passages are rendered from Markdown written by anyone, so every page goes
through the sanitizer. See [the docs](https://example.com/docs "Docs") or the
[local notes](./notes.md).

## Install

```bash
cargo install passage --locked
```

Run `passage --help` for options, or `passage serve --port 8080` to preview.

## Layout

| Key | Meaning | Default |
|:----|:-------:|--------:|
| `title` | Page title | *none* |
| `draft` | Hide from lists | `false` |

> Quotes keep their *inline* markup
> and span lines.

![Screenshot of the reader](img/reader.png "Reader")

## Code

```rust
fn main() {
    let passages = vec!["one", "two"];
    for p in &passages {
        println!("{p}");
    }
}
```

```js
document.querySelectorAll('.copy-code-btn').forEach((b) => b.click());
```

- first
- second
- third

## Install

Duplicate headings get distinct ids.
"#;

fn bench_render(c: &mut Criterion) {
  let mut group = c.benchmark_group("render");

  let plain = MarkdownProcessor::new(
    MarkdownOptionsBuilder::new().highlight_code(false).build(),
  );
  let highlighted = MarkdownProcessor::new(
    MarkdownOptionsBuilder::new().highlight_code(true).build(),
  );
  let fallback = MarkdownProcessor::new(
    MarkdownOptionsBuilder::new()
      .engine(EngineMode::FallbackOnly)
      .build(),
  );

  for (size, doc) in [("small", DOC_SMALL), ("large", DOC_LARGE)] {
    group.bench_with_input(BenchmarkId::new("plain", size), &doc, |b, doc| {
      b.iter(|| plain.render(black_box(doc)));
    });
    group.bench_with_input(
      BenchmarkId::new("highlighted", size),
      &doc,
      |b, doc| {
        b.iter(|| highlighted.render(black_box(doc)));
      },
    );
    group.bench_with_input(BenchmarkId::new("fallback", size), &doc, |b, doc| {
      b.iter(|| fallback.render(black_box(doc)));
    });
  }

  group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
  let mut group = c.benchmark_group("sanitize");
  let html = render_fallback(DOC_LARGE);
  let over = SanitizeOverride::default();

  group.bench_function("default", |b| {
    b.iter(|| sanitize(black_box(&html), black_box(&over)));
  });

  group.finish();
}

criterion_group!(benches, bench_render, bench_sanitize);
criterion_main!(benches);
