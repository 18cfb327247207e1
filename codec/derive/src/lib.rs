//! Derive tagged record codecs for `commonware-bin`.

use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;
use std::collections::BTreeMap;
use syn::{
    parse_macro_input, spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, Ident,
    Lit, LitStr, Meta, NestedMeta, PathArguments, Type,
};

/// A field that is written to the wire.
struct Tagged<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    tag: u64,
}

/// A channel or function field. It keeps its tag but carries no payload.
struct Detached<'a> {
    ident: &'a Ident,
    tag: u64,
}

/// Whether `ty` names a channel sender or a function pointer.
fn is_unsupported(ty: &Type) -> bool {
    match ty {
        Type::BareFn(_) => true,
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == "Sender" || segment.ident == "SyncSender"),
        Type::Paren(inner) => is_unsupported(&inner.elem),
        _ => false,
    }
}

/// Returns the inner type of `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Options parsed from `#[bin(...)]`.
#[derive(Default)]
struct Options {
    tag: Option<u64>,
    skip: bool,
}

fn parse_options(field: &syn::Field) -> Result<Options, Error> {
    let mut options = Options::default();
    for attr in field.attrs.iter().filter(|attr| attr.path.is_ident("bin")) {
        let Meta::List(list) = attr.parse_meta()? else {
            return Err(Error::new(attr.span(), "expected #[bin(...)]"));
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::Path(path)) if path.is_ident("skip") => {
                    options.skip = true;
                }
                NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("tag") => {
                    let Lit::Int(lit) = &nv.lit else {
                        return Err(Error::new(nv.lit.span(), "tag must be an integer"));
                    };
                    let tag = lit.base10_parse::<u64>()?;
                    if tag == 0 {
                        return Err(Error::new(lit.span(), "tag must be positive"));
                    }
                    options.tag = Some(tag);
                }
                other => {
                    return Err(Error::new(
                        other.span(),
                        "expected `tag = N` or `skip`",
                    ))
                }
            }
        }
    }
    Ok(options)
}

/// Derives the codec traits for a struct with named fields, writing it as a tagged record.
///
/// Each field is identified on the wire by a tag: its 1-based position in the declaration, unless
/// overridden with `#[bin(tag = N)]`. Fields marked `#[bin(skip)]` are neither written nor read.
///
/// Fields holding their zero value are omitted when writing. When reading, omitted (and skipped)
/// fields are set to their `Default`, so every field type must implement it. A tag not declared by
/// the struct fails the decode.
///
/// Channel and function fields (`Option<Sender<T>>`, `Option<SyncSender<T>>`, `Option<fn(..)>`)
/// keep their tag but are never written. Their tag is accepted with an empty payload when read and
/// the field is left as `None`. They must be wrapped in `Option`.
///
/// Generates `Describe`, `Write`, `Read`, `ToValue`, `FromValue` and `FromRecord`.
#[proc_macro_derive(Record, attributes(bin))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> Result<TokenStream2, Error> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(
            input.ident.span(),
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new(
            input.ident.span(),
            "Record can only be derived for structs with named fields",
        ));
    };

    // Assign tags
    let mut tagged = Vec::new();
    let mut skipped = Vec::new();
    let mut detached = Vec::new();
    let mut seen = BTreeMap::new();
    for (index, field) in named.named.iter().enumerate() {
        let options = parse_options(field)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if options.skip {
            skipped.push(ident);
            continue;
        }
        let tag = options.tag.unwrap_or(index as u64 + 1);
        if let Some(other) = seen.insert(tag, ident) {
            return Err(Error::new(
                field.span(),
                format!("tag {tag} is already used by `{other}`"),
            ));
        }
        if is_unsupported(&field.ty) {
            return Err(Error::new(
                field.ty.span(),
                "channel and function fields must be wrapped in `Option`",
            ));
        }
        if option_inner(&field.ty).map_or(false, is_unsupported) {
            detached.push(Detached { ident, tag });
            continue;
        }
        tagged.push(Tagged {
            ident,
            ty: &field.ty,
            tag,
        });
    }

    let krate = quote!(::commonware_bin);
    let name = &input.ident;
    let name_str = LitStr::new(&name.to_string(), name.span());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let idents: Vec<_> = tagged.iter().map(|field| field.ident).collect();
    let types: Vec<_> = tagged.iter().map(|field| field.ty).collect();
    let tags: Vec<_> = tagged
        .iter()
        .map(|field| Literal::u64_suffixed(field.tag))
        .collect();
    let detached_idents: Vec<_> = detached.iter().map(|field| field.ident).collect();
    let detached_tags: Vec<_> = detached
        .iter()
        .map(|field| Literal::u64_suffixed(field.tag))
        .collect();
    let locals: Vec<_> = idents
        .iter()
        .map(|ident| Ident::new(&format!("__{ident}"), ident.span()))
        .collect();

    Ok(quote! {
        impl #impl_generics #krate::Describe for #name #ty_generics #where_clause {
            fn describe() -> #krate::Type {
                #krate::Type::Record
            }
        }

        impl #impl_generics #krate::Write for #name #ty_generics #where_clause {
            fn write(
                &self,
                encoder: &mut #krate::Encoder<'_>,
            ) -> ::core::result::Result<(), #krate::Error> {
                let mut count = 0usize;
                #(
                    if !#krate::Write::is_zero(&self.#idents) {
                        count += 1;
                    }
                )*
                encoder.put_len(count);
                #(
                    if !#krate::Write::is_zero(&self.#idents) {
                        encoder.put_field(#tags, &self.#idents)?;
                    }
                )*
                ::core::result::Result::Ok(())
            }

            fn is_zero(&self) -> bool {
                true #(&& #krate::Write::is_zero(&self.#idents))*
            }
        }

        impl #impl_generics #krate::Read for #name #ty_generics #where_clause {
            fn read(
                decoder: &mut #krate::Decoder<'_>,
            ) -> ::core::result::Result<Self, #krate::Error> {
                decoder.nested(|decoder| {
                    #(
                        let mut #locals: ::core::option::Option<#types> = ::core::option::Option::None;
                    )*
                    let count = decoder.get_field_count()?;
                    for _ in 0..count {
                        match decoder.get_tag()? {
                            #(
                                #tags => {
                                    #locals = ::core::option::Option::Some(
                                        <#types as #krate::Read>::read(decoder)?,
                                    );
                                }
                            )*
                            #(#detached_tags => {})*
                            tag => {
                                return ::core::result::Result::Err(
                                    #krate::Error::UnknownTag(tag, #name_str),
                                );
                            }
                        }
                    }
                    ::core::result::Result::Ok(Self {
                        #(#idents: #locals.unwrap_or_default(),)*
                        #(#detached_idents: ::core::option::Option::None,)*
                        #(#skipped: ::core::default::Default::default(),)*
                    })
                })
            }
        }

        impl #impl_generics #krate::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self) -> #krate::Value {
                let mut fields = ::std::vec::Vec::<(#krate::Tag, #krate::Value)>::new();
                #(
                    if !#krate::Write::is_zero(&self.#idents) {
                        fields.push((#tags, #krate::ToValue::to_value(&self.#idents)));
                    }
                )*
                #krate::Value::Record(fields.into_iter().collect())
            }
        }

        impl #impl_generics #krate::FromRecord for #name #ty_generics #where_clause {
            fn from_record(record: &#krate::GenericRecord) -> Self {
                Self {
                    #(
                        #idents: record
                            .get(#tags)
                            .and_then(<#types as #krate::FromValue>::from_value)
                            .unwrap_or_default(),
                    )*
                    #(#detached_idents: ::core::option::Option::None,)*
                    #(#skipped: ::core::default::Default::default(),)*
                }
            }
        }

        impl #impl_generics #krate::FromValue for #name #ty_generics #where_clause {
            fn from_value(value: &#krate::Value) -> ::core::option::Option<Self> {
                value
                    .as_record()
                    .map(<Self as #krate::FromRecord>::from_record)
            }
        }
    })
}
