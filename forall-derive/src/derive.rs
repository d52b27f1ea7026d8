//! Expansion of `#[derive(Arbitrary)]`.
//!
//! The generated `arbitrary` resolves one generator per field from the
//! registry up front, then builds a sampler drawing the fields in
//! declaration order.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DataEnum, DeriveInput, Error, Fields, GenericParam, Ident, Result, parse_macro_input,
    parse_quote,
};

/// Main entry point for the Arbitrary derive macro
pub fn derive_arbitrary_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_arbitrary_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Field generators to resolve and the expression building one value
struct Expansion {
    resolutions: Vec<TokenStream>,
    construct: TokenStream,
}

fn generate_arbitrary_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let mut generics = input.generics.clone();
    add_trait_bounds(&mut generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expansion = match &input.data {
        Data::Struct(data_struct) => {
            generate_fields(quote! { #name }, &data_struct.fields, "field")
        }
        Data::Enum(data_enum) => generate_enum(name, data_enum)?,
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Arbitrary derive is not supported for unions",
            ));
        }
    };

    let Expansion {
        resolutions,
        construct,
    } = expansion;

    // Field-less structs never touch the cursor
    let random = if resolutions.is_empty() && matches!(input.data, Data::Struct(_)) {
        format_ident!("_random")
    } else {
        format_ident!("random")
    };

    Ok(quote! {
        impl #impl_generics ::forall::Arbitrary for #name #ty_generics #where_clause {
            fn arbitrary(
                registry: &::forall::GeneratorRegistry,
            ) -> ::core::result::Result<::forall::Generator<Self>, ::forall::ConfigError> {
                #(#resolutions)*
                ::core::result::Result::Ok(::forall::Generator::try_create(
                    move |#random: &mut ::forall::Random|
                        -> ::core::result::Result<Self, ::forall::GenerationError> {
                        ::core::result::Result::Ok(#construct)
                    },
                ))
            }
        }
    })
}

/// Add the bounds a registered generator needs to every type parameter
fn add_trait_bounds(generics: &mut syn::Generics) {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(::core::clone::Clone));
            type_param.bounds.push(parse_quote!(::core::marker::Send));
            type_param.bounds.push(parse_quote!(::core::marker::Sync));
            type_param.bounds.push(parse_quote!('static));
        }
    }
}

/// Resolve and draw every field of a struct or variant at `path`
fn generate_fields(path: TokenStream, fields: &Fields, prefix: &str) -> Expansion {
    let bindings: Vec<Ident> = (0..fields.len())
        .map(|index| format_ident!("__forall_{}_{}", prefix, index))
        .collect();

    let resolutions = fields
        .iter()
        .zip(&bindings)
        .map(|(field, binding)| {
            let ty = &field.ty;
            quote! {
                let #binding = registry.resolve::<#ty>()?;
            }
        })
        .collect();

    let draws = bindings.iter().map(|binding| quote! { #binding.generate(random)? });

    let construct = match fields {
        Fields::Named(fields_named) => {
            let names = fields_named.named.iter().map(|field| &field.ident);
            quote! { #path { #(#names: #draws,)* } }
        }
        Fields::Unnamed(_) => quote! { #path( #(#draws,)* ) },
        Fields::Unit => path,
    };

    Expansion {
        resolutions,
        construct,
    }
}

/// Uniform choice of variant, then the variant's fields
fn generate_enum(name: &Ident, data_enum: &DataEnum) -> Result<Expansion> {
    if data_enum.variants.is_empty() {
        return Err(Error::new_spanned(
            name,
            "Cannot derive Arbitrary for an empty enum",
        ));
    }

    let mut resolutions = Vec::new();
    let mut arms = Vec::new();
    let last = data_enum.variants.len() - 1;

    for (index, variant) in data_enum.variants.iter().enumerate() {
        let variant_name = &variant.ident;
        let prefix = format!("variant{}", index);
        let expansion = generate_fields(quote! { #name::#variant_name }, &variant.fields, &prefix);
        resolutions.extend(expansion.resolutions);

        let construct = expansion.construct;
        if index == last {
            arms.push(quote! { _ => #construct });
        } else {
            arms.push(quote! { #index => #construct });
        }
    }

    let variant_count = data_enum.variants.len();
    let construct = quote! {
        match ::forall::rand::Rng::gen_range(random, 0..#variant_count) {
            #(#arms,)*
        }
    };

    Ok(Expansion {
        resolutions,
        construct,
    })
}
