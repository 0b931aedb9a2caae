//! Content stream interpreter.
//!
//! Walks the operators of a decoded content stream, maintaining the graphics
//! and text state needed to position glyphs, and reports every shown glyph
//! to a [`ContentHandler`]. Form XObjects are entered through `Do` up to
//! [`ExtractOptions::max_recursion_depth`] levels deep. Path painting,
//! colour and images are skipped.

use std::collections::HashMap;
use std::rc::Rc;

use bingo_core::{Ctm, ExtractOptions};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use tracing::trace;

use crate::error::BackendError;
use crate::font::{LoadedFont, load_font};
use crate::handler::{CharEvent, ContentHandler};
use crate::lopdf_backend::{decode_content_stream, object_to_f64, resolve};
use crate::text_state::{TextMatrices, TextParams};

/// The part of the graphics state saved by `q` and restored by `Q`.
#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Ctm,
    text: TextParams,
    font: Option<Rc<LoadedFont>>,
}

/// Mutable interpreter state shared across nested Form XObjects.
#[derive(Debug, Default)]
pub struct InterpreterState {
    current: GraphicsState,
    stack: Vec<GraphicsState>,
    matrices: TextMatrices,
    fonts: HashMap<ObjectId, Rc<LoadedFont>>,
}

impl InterpreterState {
    /// State with the given initial CTM.
    pub fn new(ctm: Ctm) -> Self {
        Self {
            current: GraphicsState {
                ctm,
                ..GraphicsState::default()
            },
            ..Self::default()
        }
    }

    pub fn ctm(&self) -> Ctm {
        self.current.ctm
    }

    pub fn text_params(&self) -> &TextParams {
        &self.current.text
    }

    fn save(&mut self) {
        self.stack.push(self.current.clone());
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
    }
}

/// Interpret one content stream.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] if the stream cannot be decoded
/// into operators. Malformed individual operators are reported through
/// [`ContentHandler::on_warning`] and skipped.
pub fn interpret_content_stream(
    doc: &Document,
    content: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    state: &mut InterpreterState,
) -> Result<(), BackendError> {
    let content = Content::decode(content)
        .map_err(|e| BackendError::Interpreter(format!("failed to decode content stream: {e}")))?;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => state.save(),
            "Q" => state.restore(),
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                    state.current.ctm = Ctm::new(a, b, c, d, e, f).concat(&state.current.ctm);
                } else {
                    malformed(handler, op);
                }
            }

            "BT" => state.matrices.begin(),
            "ET" => {}

            "Tc" => set_param(handler, op, |v| state.current.text.char_spacing = v),
            "Tw" => set_param(handler, op, |v| state.current.text.word_spacing = v),
            "Tz" => set_param(handler, op, |v| state.current.text.h_scaling = v),
            "TL" => set_param(handler, op, |v| state.current.text.leading = v),
            "Ts" => set_param(handler, op, |v| state.current.text.rise = v),
            "Tf" => {
                let name = operands.first().and_then(|o| o.as_name().ok());
                let size = operands.get(1).and_then(|o| object_to_f64(o).ok());
                match (name, size) {
                    (Some(name), Some(size)) => {
                        let name = String::from_utf8_lossy(name).into_owned();
                        let font = font_for(doc, resources, &name, state);
                        state.current.font = Some(font);
                        state.current.text.font_name = name;
                        state.current.text.font_size = size;
                    }
                    _ => malformed(handler, op),
                }
            }

            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    state.matrices.move_line(tx, ty);
                } else {
                    malformed(handler, op);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    state.current.text.leading = -ty;
                    state.matrices.move_line(tx, ty);
                } else {
                    malformed(handler, op);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                    state.matrices.set(Ctm::new(a, b, c, d, e, f));
                } else {
                    malformed(handler, op);
                }
            }
            "T*" => state.matrices.next_line(state.current.text.leading),

            "Tj" => match operands.first() {
                Some(Object::String(bytes, _)) => show_string(bytes, state, handler),
                _ => malformed(handler, op),
            },
            "'" => match operands.first() {
                Some(Object::String(bytes, _)) => {
                    state.matrices.next_line(state.current.text.leading);
                    show_string(bytes, state, handler);
                }
                _ => malformed(handler, op),
            },
            "\"" => match (numbers::<2>(operands), operands.get(2)) {
                (Some([aw, ac]), Some(Object::String(bytes, _))) => {
                    state.current.text.word_spacing = aw;
                    state.current.text.char_spacing = ac;
                    state.matrices.next_line(state.current.text.leading);
                    show_string(bytes, state, handler);
                }
                _ => malformed(handler, op),
            },
            "TJ" => match operands.first().and_then(|o| o.as_array().ok()) {
                Some(items) => {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => show_string(bytes, state, handler),
                            other => {
                                if let Ok(adjust) = object_to_f64(other) {
                                    let text = &state.current.text;
                                    let tx = -(adjust / 1000.0) * text.font_size * text.h_scale();
                                    state.matrices.advance(tx);
                                }
                            }
                        }
                    }
                }
                None => malformed(handler, op),
            },

            "Do" => match operands.first().and_then(|o| o.as_name().ok()) {
                Some(name) => {
                    let name = String::from_utf8_lossy(name).into_owned();
                    handle_do(doc, resources, handler, options, depth, state, &name)?;
                }
                None => malformed(handler, op),
            },

            _ => {}
        }
    }

    Ok(())
}

/// Show the glyphs of one string operand, advancing the text matrix.
fn show_string(bytes: &[u8], state: &mut InterpreterState, handler: &mut dyn ContentHandler) {
    let font = match &state.current.font {
        Some(font) => Rc::clone(font),
        None => {
            trace!("text shown before any Tf, using fallback metrics");
            let fallback = Rc::new(LoadedFont::fallback(&state.current.text.font_name));
            state.current.font = Some(Rc::clone(&fallback));
            fallback
        }
    };
    let text = state.current.text.clone();
    let h_scale = text.h_scale();

    for &byte in bytes {
        let code = u32::from(byte);
        let width = font.width(code);
        handler.on_char(CharEvent {
            char_code: code,
            unicode: font.decode(byte).to_string(),
            font_name: font.base_font.clone(),
            font_size: text.font_size,
            text_matrix: state.matrices.text_matrix(),
            ctm: state.current.ctm,
            displacement: width,
            h_scaling: h_scale,
            rise: text.rise,
            descent: font.descent,
        });

        let word_spacing = if byte == b' ' { text.word_spacing } else { 0.0 };
        let tx = ((width / 1000.0) * text.font_size + text.char_spacing + word_spacing) * h_scale;
        state.matrices.advance(tx);
    }
}

/// Resolve `/Font/<name>` in `resources`, caching fonts by object id.
fn font_for(
    doc: &Document,
    resources: &lopdf::Dictionary,
    name: &str,
    state: &mut InterpreterState,
) -> Rc<LoadedFont> {
    let entry = resources
        .get(b"Font")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .and_then(|fonts| fonts.get(name.as_bytes()).ok());

    let Some(entry) = entry else {
        trace!(font = name, "font not found in resources");
        return Rc::new(LoadedFont::fallback(name));
    };

    let id = entry.as_reference().ok();
    if let Some(cached) = id.and_then(|id| state.fonts.get(&id)) {
        return Rc::clone(cached);
    }

    let font = match resolve(doc, entry).as_dict() {
        Ok(dict) => Rc::new(load_font(doc, dict)),
        Err(_) => {
            trace!(font = name, "font resource is not a dictionary");
            Rc::new(LoadedFont::fallback(name))
        }
    };
    if let Some(id) = id {
        state.fonts.insert(id, Rc::clone(&font));
    }
    font
}

fn handle_do(
    doc: &Document,
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    state: &mut InterpreterState,
    name: &str,
) -> Result<(), BackendError> {
    let stream = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
        .and_then(|o| resolve(doc, o).as_stream().ok());

    let Some(stream) = stream else {
        handler.on_warning(format!("XObject /{name} not found in resources"));
        return Ok(());
    };

    let is_form = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|s| s == b"Form");
    if !is_form {
        return Ok(());
    }

    if depth >= options.max_recursion_depth {
        handler.on_warning(format!(
            "Form XObject /{name} skipped: recursion depth {} exceeds limit {}",
            depth + 1,
            options.max_recursion_depth
        ));
        return Ok(());
    }

    let form_resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
        .unwrap_or(resources);

    let bytes = decode_content_stream(stream).map_err(|e| {
        BackendError::Interpreter(format!("failed to decode Form XObject /{name}: {e}"))
    })?;

    state.save();
    let saved_matrices = state.matrices;
    if let Some(matrix) = stream
        .dict
        .get(b"Matrix")
        .ok()
        .and_then(|o| resolve(doc, o).as_array().ok())
        .and_then(|arr| numbers::<6>(arr))
    {
        let [a, b, c, d, e, f] = matrix;
        state.current.ctm = Ctm::new(a, b, c, d, e, f).concat(&state.current.ctm);
    }

    let result = interpret_content_stream(
        doc,
        &bytes,
        form_resources,
        handler,
        options,
        depth + 1,
        state,
    );

    state.matrices = saved_matrices;
    state.restore();
    result
}

/// The first `N` operands as numbers, if they all are.
fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(operands.get(..N)?) {
        *slot = object_to_f64(obj).ok()?;
    }
    Some(out)
}

fn set_param(handler: &mut dyn ContentHandler, op: &Operation, mut apply: impl FnMut(f64)) {
    match numbers::<1>(&op.operands) {
        Some([v]) => apply(v),
        None => malformed(handler, op),
    }
}

fn malformed(handler: &mut dyn ContentHandler, op: &Operation) {
    handler.on_warning(format!(
        "ignoring '{}' with operands {:?}",
        op.operator, op.operands
    ));
}
