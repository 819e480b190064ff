use std::collections::HashMap;
use std::sync::OnceLock;

use crate::evaluation::domain::fields;
use crate::evaluation::text::fold;

static HEADER_ALIASES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Canonical field name for a sheet header: BOM and zero-width characters
/// dropped, accents folded, whitespace collapsed to `_`, known aliases mapped.
pub(crate) fn header_key(header: &str) -> String {
    let folded = fold(header).replace('²', "2");
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join("_");

    header_aliases()
        .get(collapsed.as_str())
        .map(|canonical| canonical.to_string())
        .unwrap_or(collapsed)
}

fn header_aliases() -> &'static HashMap<&'static str, &'static str> {
    HEADER_ALIASES.get_or_init(|| {
        const ALIASES: &[(&str, &str)] = &[
            ("url", fields::LINK),
            ("activa", fields::ACTIVE),
            ("domicilio", fields::ADDRESS),
            ("precio_usd", fields::PRICE),
            ("m2_cubiertos", fields::COVERED_AREA),
            ("m2_totales", fields::TOTAL_AREA),
            ("m2_descubiertos", fields::UNCOVERED_AREA),
            ("apto_credito_hipotecario", fields::CREDIT_ELIGIBLE),
            ("apto_credito?", fields::CREDIT_ELIGIBLE),
            ("publicado", fields::PUBLISHED_ON),
            ("fecha_publicacion", fields::PUBLISHED_ON),
            ("cochera", fields::GARAGES),
            ("ambientes", fields::ROOMS),
            ("banos_completos", fields::BATHROOMS),
            ("edad", fields::AGE),
        ];

        ALIASES.iter().copied().collect()
    })
}
