//! Reader: token stream to term tree.

use crate::error::{Result, ScriptError};
use crate::heap::TermHeap;
use crate::language::Term;
use crate::lexer::{InputStream, Token};

/// Parse one expression from the stream.
///
/// Returns `None` when the next token is `)` — the end-of-list signal the
/// recursive calls use. Running out of input here means an open list was
/// never closed.
pub fn parse(heap: &TermHeap, stream: &mut InputStream) -> Result<Option<Term>> {
    match stream.next_token()? {
        None => Err(ScriptError::UnbalancedParens),
        Some(Token::Close) => Ok(None),
        Some(token) => parse_value(heap, stream, token).map(Some),
    }
}

fn parse_value(heap: &TermHeap, stream: &mut InputStream, token: Token) -> Result<Term> {
    match token {
        Token::Open => {
            let mut items = Vec::new();
            while let Some(sub_expr) = parse(heap, stream)? {
                items.push(sub_expr);
            }
            heap.list_from_vec(items)
        }
        Token::Str(s) => heap.string(s),
        Token::Float(f) => heap.float(f),
        Token::Word(w) => heap.atom_named(&w),
        Token::Close => Err(ScriptError::UnexpectedToken(")".into())),
    }
}

/// Parse every top-level form until end of stream, returned as one list.
/// This is how a whole script file becomes a single evaluable sequence.
pub fn parse_sequence(heap: &TermHeap, stream: &mut InputStream) -> Result<Term> {
    let mut forms = Vec::new();
    loop {
        match stream.next_token()? {
            None => break,
            Some(Token::Close) => return Err(ScriptError::UnexpectedToken(")".into())),
            Some(token) => forms.push(parse_value(heap, stream, token)?),
        }
    }
    heap.list_from_vec(forms)
}

/// Parse a single expression from an in-memory string.
pub fn parse_str(heap: &TermHeap, source: &str) -> Result<Term> {
    let mut stream = InputStream::new(source);
    match parse(heap, &mut stream)? {
        Some(term) => Ok(term),
        None => Err(ScriptError::UnexpectedToken(")".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapConfig;
    use crate::language::TermKind;

    fn heap() -> TermHeap {
        TermHeap::new(&HeapConfig::default())
    }

    #[test]
    fn parses_nested_lists() {
        let heap = heap();
        let term = parse_str(&heap, "(a (b c) 1.5)").unwrap();
        assert_eq!(term.list_len(), 3);
        let items: Vec<_> = term.iter().collect();
        assert_eq!(items[0].as_atom().unwrap().name(), "a");
        assert_eq!(items[1].list_len(), 2);
        assert_eq!(items[2].as_float(), Some(1.5));
    }

    #[test]
    fn empty_list_has_no_element() {
        let heap = heap();
        let term = parse_str(&heap, "()").unwrap();
        assert!(matches!(term.kind(), TermKind::List(cell) if cell.element.is_none()));
        assert_eq!(term.list_len(), 0);
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        let heap = heap();
        assert!(matches!(
            parse_str(&heap, "(a (b c)"),
            Err(ScriptError::UnbalancedParens)
        ));
        assert!(matches!(
            parse_str(&heap, ")"),
            Err(ScriptError::UnexpectedToken(_))
        ));
    }

    #[test]
    fn sequence_collects_top_level_forms() {
        let heap = heap();
        let mut stream = InputStream::new("(a b)\n# comment\n(c d)\n1.0\n");
        let forms = parse_sequence(&heap, &mut stream).unwrap();
        assert_eq!(forms.list_len(), 3);
    }
}
