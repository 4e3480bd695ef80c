//! Walks a page content stream and collects positioned text runs.
//!
//! Only the state needed for vertical position and decoding is tracked: the
//! CTM (`cm`, `q`/`Q`), the text and line matrices (`BT`, `Tm`, `Td`, `TD`,
//! `T*`), the leading (`TL`) and the current font (`Tf`). Form XObjects
//! painted with `Do` are walked in place. Glyph widths are not computed, so
//! runs on one baseline keep the position of their first glyph.

use std::sync::Arc;

use idnxtr_core::TextRun;

use crate::font::FontDecoder;
use crate::resources::{FormXObject, PageContent, PageResources};
use crate::tokenizer::{Operand, Operation, tokenize};

/// `TJ` adjustments more negative than this (thousandths of an em) are word
/// gaps.
const TJ_SPACE_THRESHOLD: f64 = -200.0;

/// Nesting limit for Form XObjects, which may refer to themselves.
const MAX_FORM_DEPTH: usize = 12;

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f64, ty: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`.
    fn then(self, other: Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }
}

/// Decode a PDF string: UTF-16BE when it starts with a byte order mark,
/// otherwise WinAnsi (windows-1252).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => encoding_rs::UTF_16BE
            .decode_without_bom_handling(rest)
            .0
            .into_owned(),
        _ => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling(bytes)
            .0
            .into_owned(),
    }
}

fn numbers<const N: usize>(operands: &[Operand]) -> Option<[f64; N]> {
    if operands.len() < N {
        return None;
    }
    let mut values = [0.0; N];
    for (slot, operand) in values.iter_mut().zip(&operands[operands.len() - N..]) {
        *slot = operand.as_number()?;
    }
    Some(values)
}

fn decode(font: Option<&FontDecoder>, bytes: &[u8]) -> String {
    match font {
        Some(font) => font.decode(bytes),
        None => decode_pdf_string(bytes),
    }
}

fn tj_array_text(items: &[Operand], font: Option<&FontDecoder>) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Operand::String(bytes) => text.push_str(&decode(font, bytes)),
            Operand::Number(adjust) if *adjust < TJ_SPACE_THRESHOLD => text.push(' '),
            _ => {}
        }
    }
    text
}

/// The part of the graphics state saved by `q` and around `Do`.
#[derive(Debug, Clone)]
struct SavedState {
    ctm: Matrix,
    font: Option<Arc<FontDecoder>>,
}

#[derive(Debug)]
struct TextWalker<'a> {
    page: &'a PageContent,
    ctm: Matrix,
    font: Option<Arc<FontDecoder>>,
    saved: Vec<SavedState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f64,
    in_text: bool,
    runs: Vec<TextRun>,
}

impl<'a> TextWalker<'a> {
    fn new(page: &'a PageContent) -> Self {
        Self {
            page,
            ctm: Matrix::IDENTITY,
            font: None,
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            in_text: false,
            runs: Vec::new(),
        }
    }

    fn save(&mut self) {
        self.saved.push(SavedState {
            ctm: self.ctm,
            font: self.font.clone(),
        });
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.ctm = state.ctm;
            self.font = state.font;
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        decode(self.font.as_deref(), bytes)
    }

    fn walk(&mut self, operations: &[Operation], resources: &PageResources, depth: usize) {
        for op in operations {
            self.apply(op, resources, depth);
        }
    }

    fn paint_form(&mut self, form: &'a FormXObject, depth: usize) {
        if depth >= MAX_FORM_DEPTH {
            tracing::warn!(depth, "Form XObject nesting too deep, skipped");
            return;
        }
        let operations = match tokenize(&form.content) {
            Ok(operations) => operations,
            Err(e) => {
                tracing::warn!("Form XObject content skipped: {e}");
                return;
            }
        };
        self.save();
        self.ctm = Matrix(form.matrix).then(self.ctm);
        self.walk(&operations, &form.resources, depth + 1);
        self.restore();
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).then(self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, text: String) {
        if !self.in_text {
            tracing::trace!("text shown outside BT/ET ignored");
            return;
        }
        let [_, _, _, _, _, y] = self.text_matrix.then(self.ctm).0;
        self.runs.push(TextRun::new(y, text));
    }

    fn apply(&mut self, op: &Operation, resources: &PageResources, depth: usize) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.save(),
            "Q" => self.restore(),
            "cm" => {
                if let Some(m) = numbers::<6>(operands).map(Matrix) {
                    self.ctm = m.then(self.ctm);
                }
            }
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(Operand::Name(name)) = operands.first() {
                    self.font = resources.font(name).cloned();
                    if self.font.is_none() {
                        tracing::trace!(font = %name, "font not in resources");
                    }
                }
            }
            "Do" => {
                let page = self.page;
                if let Some(form) = operands
                    .last()
                    .and_then(|o| match o {
                        Operand::Name(name) => resources.form(name),
                        _ => None,
                    })
                    .and_then(|id| page.form(id))
                {
                    self.paint_form(form, depth);
                }
            }
            "TL" => {
                if let Some([leading]) = numbers::<1>(operands) {
                    self.leading = leading;
                }
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(operands).map(Matrix) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    self.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Operand::String(bytes)) = operands.last() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = operands.last() {
                    let text = tj_array_text(items, self.font.as_deref());
                    self.show(text);
                }
            }
            "'" | "\"" => {
                self.next_line();
                if let Some(Operand::String(bytes)) = operands.last() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }
}

/// Collect the text runs of a tokenized page in document order. Fonts and
/// Form XObjects are looked up in `page`.
pub fn text_runs(operations: &[Operation], page: &PageContent) -> Vec<TextRun> {
    let mut walker = TextWalker::new(page);
    walker.walk(operations, &page.resources, 0);
    walker.runs
}
