//! Functions registered with every template set.
//!
//! - `asset(path=...)`: prefixes `path` with the configured asset URL prefix
//! - `markdown(document=...)`: renders a document's Markdown to HTML
//! - `toc(document=..., max_level=...)`: renders a document's table of
//!   contents
//!
//! `markdown` and `toc` produce HTML and are marked safe, so autoescaping
//! leaves their output alone.
use std::{collections::HashMap, sync::Arc};

use folio_commonmark::{MarkdownProcessor, MarkdownResult, render_toc};
use tera::{
  Function,
  Value,
  ast::{Expr, ExprVal, Node},
};

use crate::{SourceDocument, registry::RegistryOptions};

pub struct AssetFunction {
  pub(crate) options: Arc<RegistryOptions>,
}

impl Function for AssetFunction {
  fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let path = args.get("path").and_then(Value::as_str).ok_or_else(|| {
      tera::Error::msg("asset() requires a string `path` argument")
    })?;
    Ok(Value::String(self.options.asset_url(path)))
  }

  fn is_safe(&self) -> bool {
    true
  }
}

pub struct MarkdownFunction {
  pub(crate) options: Arc<RegistryOptions>,
}

impl Function for MarkdownFunction {
  fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let document = document_arg("markdown", args)?;
    Ok(Value::String(render_document(&self.options, &document).html))
  }

  fn is_safe(&self) -> bool {
    true
  }
}

pub struct TocFunction {
  pub(crate) options: Arc<RegistryOptions>,
}

impl Function for TocFunction {
  fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let document = document_arg("toc", args)?;
    let max_level = match args.get("max_level") {
      Some(value) => {
        tera::from_value::<u8>(value.clone()).map_err(|e| {
          tera::Error::msg(format!("toc(): invalid `max_level`: {e}"))
        })?
      },
      None => self.options.toc_max_level,
    };

    let sections = render_document(&self.options, &document).sections();
    Ok(Value::String(render_toc(&sections, max_level)))
  }

  fn is_safe(&self) -> bool {
    true
  }
}

/// Render a document with links resolved against its own directory.
pub fn render_document(
  options: &RegistryOptions,
  document: &SourceDocument,
) -> MarkdownResult {
  MarkdownProcessor::new(options.markdown_options(&document.base_url()))
    .render(&document.content)
}

fn document_arg(
  function: &str,
  args: &HashMap<String, Value>,
) -> tera::Result<SourceDocument> {
  let value = args.get("document").ok_or_else(|| {
    tera::Error::msg(format!("{function}() requires a `document` argument"))
  })?;
  tera::from_value(value.clone()).map_err(|e| {
    tera::Error::msg(format!(
      "{function}(): `document` is not a source document: {e}"
    ))
  })
}

/// First function called anywhere in `ast` for which `is_known` is false.
///
/// Filters and macro calls are not functions and are not checked, but their
/// arguments are.
pub fn first_unknown_function(
  ast: &[Node],
  is_known: &dyn Fn(&str) -> bool,
) -> Option<String> {
  ast.iter().find_map(|node| unknown_in_node(node, is_known))
}

fn unknown_in_node(
  node: &Node,
  is_known: &dyn Fn(&str) -> bool,
) -> Option<String> {
  let in_expr = |expr: &Expr| unknown_in_expr(expr, is_known);
  let in_body = |body: &[Node]| first_unknown_function(body, is_known);

  match node {
    Node::VariableBlock(_, expr) => in_expr(expr),
    Node::Set(_, set) => in_expr(&set.value),
    Node::MacroDefinition(_, definition, _) => {
      definition
        .args
        .values()
        .flatten()
        .find_map(in_expr)
        .or_else(|| in_body(&definition.body))
    },
    Node::FilterSection(_, section, _) => {
      section
        .filter
        .args
        .values()
        .find_map(in_expr)
        .or_else(|| in_body(&section.body))
    },
    Node::Block(_, block, _) => in_body(&block.body),
    Node::Forloop(_, forloop, _) => {
      in_expr(&forloop.container)
        .or_else(|| in_body(&forloop.body))
        .or_else(|| forloop.empty_body.as_deref().and_then(in_body))
    },
    Node::If(branches, _) => {
      branches
        .conditions
        .iter()
        .find_map(|(_, condition, body)| {
          in_expr(condition).or_else(|| in_body(body))
        })
        .or_else(|| {
          branches
            .otherwise
            .as_ref()
            .and_then(|(_, body)| in_body(body))
        })
    },
    Node::Super
    | Node::Text(_)
    | Node::Extends(..)
    | Node::Include(..)
    | Node::ImportMacro(..)
    | Node::Raw(..)
    | Node::Break(_)
    | Node::Continue(_)
    | Node::Comment(..) => None,
  }
}

fn unknown_in_expr(
  expr: &Expr,
  is_known: &dyn Fn(&str) -> bool,
) -> Option<String> {
  unknown_in_value(&expr.val, is_known).or_else(|| {
    expr
      .filters
      .iter()
      .flat_map(|filter| filter.args.values())
      .find_map(|arg| unknown_in_expr(arg, is_known))
  })
}

fn unknown_in_value(
  value: &ExprVal,
  is_known: &dyn Fn(&str) -> bool,
) -> Option<String> {
  let in_expr = |expr: &Expr| unknown_in_expr(expr, is_known);

  match value {
    ExprVal::FunctionCall(call) => {
      if is_known(&call.name) {
        call.args.values().find_map(in_expr)
      } else {
        Some(call.name.clone())
      }
    },
    ExprVal::Math(math) => in_expr(&math.lhs).or_else(|| in_expr(&math.rhs)),
    ExprVal::Logic(logic) => {
      in_expr(&logic.lhs).or_else(|| in_expr(&logic.rhs))
    },
    ExprVal::In(contains) => {
      in_expr(&contains.lhs).or_else(|| in_expr(&contains.rhs))
    },
    ExprVal::Test(test) => test.args.iter().find_map(in_expr),
    ExprVal::MacroCall(call) => call.args.values().find_map(in_expr),
    ExprVal::Array(items) => items.iter().find_map(in_expr),
    ExprVal::StringConcat(concat) => {
      concat
        .values
        .iter()
        .find_map(|value| unknown_in_value(value, is_known))
    },
    ExprVal::String(_)
    | ExprVal::Int(_)
    | ExprVal::Float(_)
    | ExprVal::Bool(_)
    | ExprVal::Ident(_) => None,
  }
}
