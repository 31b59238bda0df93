//! AST transformers that swap comrak nodes for the custom renderers' output.
//!
//! Headings are handled first so their text is read before any inline code
//! inside them is replaced. Everything else is handled in one reverse
//! pre-order pass: descendants are always rendered before their ancestors, so
//! a link or blockquote formats children that are already final HTML.
use std::cell::RefCell;

use comrak::{
  nodes::{AstNode, NodeHeading, NodeValue, TableAlignment},
  options::Options,
};

use super::types::AstTransformer;
use crate::{
  error::RenderError,
  render::{
    CodeRenderer,
    HeadingSlugs,
    IdGenerator,
    render_blockquote,
    render_heading,
    render_image,
    render_link,
    render_table,
  },
  types::Header,
  utils::extract_inline_text,
};

/// Replace `node` with raw HTML, dropping its children.
fn replace_with_html<'a>(node: &'a AstNode<'a>, html: String) {
  let children: Vec<_> = node.children().collect();
  for child in children {
    child.detach();
  }
  node.data.borrow_mut().value = NodeValue::HtmlInline(html);
}

/// Render each child of `node` with comrak and concatenate the output.
fn format_children<'a>(
  node: &'a AstNode<'a>,
  options: &Options,
) -> Result<String, RenderError> {
  let mut out = String::new();
  for child in node.children() {
    comrak::format_html(child, options, &mut out)
      .map_err(|e| RenderError::ParseFailure(e.to_string()))?;
  }
  Ok(out)
}

fn is_inside_image<'a>(node: &'a AstNode<'a>) -> bool {
  node
    .ancestors()
    .skip(1)
    .any(|a| matches!(a.data.borrow().value, NodeValue::Image(..)))
}

/// Assigns unique ids to headings and collects them.
#[derive(Debug, Default)]
pub struct HeadingTransformer {
  slugs:   RefCell<HeadingSlugs>,
  headers: RefCell<Vec<Header>>,
}

impl HeadingTransformer {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Headers seen so far, in document order.
  #[must_use]
  pub fn into_headers(self) -> Vec<Header> {
    self.headers.into_inner()
  }
}

impl AstTransformer for HeadingTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>) -> Result<(), RenderError> {
    let headings: Vec<_> = node
      .descendants()
      .filter_map(|n| {
        match n.data.borrow().value {
          NodeValue::Heading(NodeHeading { level, .. }) => Some((n, level)),
          _ => None,
        }
      })
      .collect();

    for (heading, level) in headings {
      let text = extract_inline_text(heading).trim().to_string();
      let id = self.slugs.borrow_mut().unique(&text);
      let html = render_heading(level, &text, &id);

      self.headers.borrow_mut().push(Header { text, level, id });
      replace_with_html(heading, format!("{html}\n"));
    }

    Ok(())
  }
}

/// Node data copied out of the arena so no borrow is held while rendering.
enum Pending {
  InlineCode(String),
  CodeBlock { info: String, literal: String },
  Link { url: String, title: String },
  Image { url: String, title: String },
  Table(Vec<TableAlignment>),
  BlockQuote,
}

/// Renders code, links, images, tables and blockquotes.
pub struct NodeTransformer<'r> {
  code:    CodeRenderer<'r>,
  options: &'r Options<'r>,
  ids:     RefCell<IdGenerator>,
}

impl<'r> NodeTransformer<'r> {
  #[must_use]
  pub fn new(code: CodeRenderer<'r>, options: &'r Options<'r>) -> Self {
    Self {
      code,
      options,
      ids: RefCell::new(IdGenerator::new()),
    }
  }

  fn pending<'a>(node: &'a AstNode<'a>) -> Option<Pending> {
    let pending = match &node.data.borrow().value {
      NodeValue::Code(code) => Pending::InlineCode(code.literal.clone()),
      NodeValue::CodeBlock(block) => {
        Pending::CodeBlock {
          info:    block.info.clone(),
          literal: block.literal.clone(),
        }
      },
      NodeValue::Link(link) => {
        Pending::Link {
          url:   link.url.clone(),
          title: link.title.clone(),
        }
      },
      NodeValue::Image(link) => {
        Pending::Image {
          url:   link.url.clone(),
          title: link.title.clone(),
        }
      },
      NodeValue::Table(table) => Pending::Table(table.alignments.clone()),
      NodeValue::BlockQuote => Pending::BlockQuote,
      _ => return None,
    };
    Some(pending)
  }

  /// Render one table row as `<tr>` with `<th>`/`<td>` cells.
  fn render_row<'a>(
    &self,
    row: &'a AstNode<'a>,
    header: bool,
    alignments: &[TableAlignment],
  ) -> Result<String, RenderError> {
    let tag = if header { "th" } else { "td" };
    let mut out = String::from("<tr>\n");
    for (i, cell) in row.children().enumerate() {
      let align = match alignments.get(i) {
        Some(TableAlignment::Left) => " align=\"left\"",
        Some(TableAlignment::Center) => " align=\"center\"",
        Some(TableAlignment::Right) => " align=\"right\"",
        _ => "",
      };
      let inner = format_children(cell, self.options)?;
      out.push_str(&format!("<{tag}{align}>{inner}</{tag}>\n"));
    }
    out.push_str("</tr>\n");
    Ok(out)
  }

  fn render_node<'a>(
    &self,
    node: &'a AstNode<'a>,
  ) -> Result<Option<String>, RenderError> {
    let Some(pending) = Self::pending(node) else {
      return Ok(None);
    };

    let html = match pending {
      // Alt text is plain text, leave its inline nodes for extraction
      Pending::InlineCode(_) | Pending::Link { .. } if is_inside_image(node) => {
        return Ok(None);
      },
      Pending::InlineCode(literal) => {
        self
          .code
          .render_inline_code(&mut self.ids.borrow_mut(), &literal)
      },
      Pending::CodeBlock { info, literal } => {
        let language = info.split_whitespace().next();
        let block = self.code.render_code_block(
          &mut self.ids.borrow_mut(),
          &literal,
          language,
        );
        format!("{block}\n")
      },
      Pending::Link { url, title } => {
        render_link(&url, &title, &format_children(node, self.options)?)
      },
      Pending::Image { url, title } => {
        render_image(&url, &extract_inline_text(node), &title)
      },
      Pending::Table(alignments) => {
        let mut header_rows = String::new();
        let mut body_rows = String::new();
        for row in node.children() {
          let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
          let rendered = self.render_row(row, header, &alignments)?;
          if header {
            header_rows.push_str(&rendered);
          } else {
            body_rows.push_str(&rendered);
          }
        }
        format!("{}\n", render_table(&header_rows, &body_rows))
      },
      Pending::BlockQuote => {
        format!(
          "{}\n",
          render_blockquote(&format_children(node, self.options)?)
        )
      },
    };

    Ok(Some(html))
  }
}

impl AstTransformer for NodeTransformer<'_> {
  fn transform<'a>(&self, node: &'a AstNode<'a>) -> Result<(), RenderError> {
    let nodes: Vec<_> = node.descendants().collect();
    for n in nodes.into_iter().rev() {
      if let Some(html) = self.render_node(n)? {
        replace_with_html(n, html);
      }
    }
    Ok(())
  }
}
