use proc_macro::TokenStream;
use quote::quote;

/// Derives [Display](std::fmt::Display) and [Error](std::error::Error) for an enum.
///
/// Every variant needs a `#[msg = "..."]` attribute.
/// * Unit variants display the message as-is.
/// * Struct-like variants treat the message as a format string. Any `{field}` placeholder
///   refers to the field of that name. A field named `source` is reported as the error source.
#[proc_macro_derive(Error, attributes(msg))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    let item: syn::ItemEnum = syn::parse(input).expect("Could not parse input as enum");

    let name = item.ident;
    let mut variant_displays = vec![];
    let mut variant_sources = vec![];

    for variant in &item.variants {
        let ident = &variant.ident;

        let display_attribute = variant
            .attrs
            .iter()
            .flat_map(|attr| match &attr.meta {
                syn::Meta::NameValue(name_value) => Some(name_value),
                _ => None,
            })
            .flat_map(|attr| {
                let ident = attr.path.get_ident()?.to_string();

                Some((ident, &attr.value))
            })
            .find(|(name, _)| name == "msg")
            .map(|(_, value)| value);

        let Some(display_value) = display_attribute else {
            panic!("need display attribute");
        };

        match &variant.fields {
            syn::Fields::Unit => {
                variant_displays.push(quote!(Self::#ident => ::std::fmt::Display::fmt(&(#display_value), f)));
            },
            syn::Fields::Unnamed(_) => panic!("tuple variants are not supported, name the fields"),
            syn::Fields::Named(named_fields) => {
                let format_string = match display_value {
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(literal),
                        ..
                    }) => literal,
                    _ => panic!("struct variants need a string literal as their message"),
                };
                let template = format_string.value();

                // Only bind the fields the message refers to, everything else is skipped with ".."
                let used_fields: Vec<&syn::Ident> = named_fields
                    .named
                    .iter()
                    .filter_map(|field| field.ident.as_ref())
                    .filter(|field| refers_to(&template, &field.to_string()))
                    .collect();

                variant_displays.push(quote!(
                    Self::#ident { #(#used_fields,)* .. } => write!(f, #format_string, #(#used_fields = #used_fields),*)
                ));

                let has_source = named_fields
                    .named
                    .iter()
                    .filter_map(|field| field.ident.as_ref())
                    .any(|field| field == "source");
                if has_source {
                    variant_sources.push(quote!(Self::#ident { source, .. } => Some(source)));
                }
            },
        }
    }

    quote!(
        #[automatically_derived]
        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> Result<(), ::std::fmt::Error> {
                match self {
                    #(
                        #variant_displays,
                    )*
                }
            }
        }

        #[automatically_derived]
        impl ::std::error::Error for #name {
            fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                match self {
                    #(
                        #variant_sources,
                    )*
                    _ => None,
                }
            }
        }
    )
    .into()
}

/// Whether `template` contains a `{field}` or `{field:...}` placeholder.
///
/// Escaped braces (`{{`) are skipped.
fn refers_to(template: &str, field: &str) -> bool {
    let mut remaining = template;
    while let Some(start) = remaining.find('{') {
        let after = &remaining[start + 1..];
        if let Some(escaped) = after.strip_prefix('{') {
            remaining = escaped;
            continue;
        }

        let end = after.find('}').unwrap_or(after.len());
        let placeholder = &after[..end];
        let argument = placeholder
            .split_once(':')
            .map_or(placeholder, |(argument, _)| argument);
        if argument.trim() == field {
            return true;
        }
        remaining = &after[end..];
    }
    false
}

#[cfg(test)]
mod tests {
    use super::refers_to;

    #[test]
    fn finds_plain_and_formatted_placeholders() {
        assert!(refers_to("at most {max} arguments", "max"));
        assert!(refers_to("value {value:?}", "value"));
        assert!(!refers_to("value {value:?}", "val"));
    }

    #[test]
    fn skips_escaped_braces() {
        assert!(!refers_to("literal {{max}}", "max"));
        assert!(refers_to("{{literal}} {max}", "max"));
    }
}
