use confset_model::{BlockSchema, FieldSchema, RepeatedBlockSchema, SingleBlockSchema};

/// Structural destination a line was routed to.
#[derive(Debug)]
pub(crate) enum Target<'s> {
    Field(&'s FieldSchema),
    Single(&'s SingleBlockSchema),
    Repeated(&'s RepeatedBlockSchema),
}

/// Match `keyword` at the start of `line` with a delimiter guard: the
/// keyword must be the whole line or be followed by a space. Returns the
/// remainder with the delimiter consumed.
pub(crate) fn match_keyword<'l>(line: &'l str, keyword: &str) -> Option<&'l str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

/// Route a line to the schema element owning its keyword.
///
/// All candidate keywords of the current block are tried and the longest
/// match wins, so `retry-count retry-interval` can never be captured by a
/// `retry-count` candidate regardless of declaration order.
pub(crate) fn dispatch<'s, 'l>(
    schema: &'s BlockSchema,
    line: &'l str,
) -> Option<(Target<'s>, &'l str)> {
    let mut best: Option<(usize, Target<'s>, &'l str)> = None;

    for field in &schema.fields {
        if let Some(rest) = match_keyword(line, field.keyword)
            && best
                .as_ref()
                .is_none_or(|(len, _, _)| field.keyword.len() > *len)
        {
            best = Some((field.keyword.len(), Target::Field(field), rest));
        }
    }
    for single in &schema.singles {
        if let Some(rest) = match_keyword(line, single.keyword)
            && best
                .as_ref()
                .is_none_or(|(len, _, _)| single.keyword.len() > *len)
        {
            best = Some((single.keyword.len(), Target::Single(single), rest));
        }
    }
    for repeated in &schema.repeated {
        if let Some(rest) = match_keyword(line, repeated.keyword)
            && best
                .as_ref()
                .is_none_or(|(len, _, _)| repeated.keyword.len() > *len)
        {
            best = Some((repeated.keyword.len(), Target::Repeated(repeated), rest));
        }
    }

    best.map(|(_, target, rest)| (target, rest))
}

/// Split one leading token off `line`, honoring a single layer of double
/// quotes with backslash escapes. Returns the raw token (quotes kept) and
/// the remainder with one separating space consumed.
pub(crate) fn split_token(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() {
        return None;
    }

    if let Some(quoted) = line.strip_prefix('"') {
        let mut escape = false;
        for (idx, ch) in quoted.char_indices() {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' => escape = true,
                '"' => {
                    let end = 1 + idx + ch.len_utf8();
                    let rest = line[end..].strip_prefix(' ').unwrap_or(&line[end..]);
                    return Some((&line[..end], rest));
                }
                _ => {}
            }
        }
        // Unterminated quote: the rest of the line is one token.
        return Some((line, ""));
    }

    match line.find(' ') {
        Some(pos) => Some((&line[..pos], &line[pos + 1..])),
        None => Some((line, "")),
    }
}
