//! `#[derive(DeviceCopy)]` for gpumap list items.
//!
//! Besides checking that every field is itself `DeviceCopy`, the derive insists on a `repr` that
//! fixes the layout of the type, since the host packer and the kernel read the same bytes.

extern crate proc_macro;

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{
    parse_str, Attribute, Data, DataEnum, DataStruct, DataUnion, DeriveInput, Field, Fields,
    Generics, Meta, NestedMeta, TypeParamBound,
};

use proc_macro::TokenStream as BaseTokenStream;

const ENUM_REPRS: &[&str] = &[
    "C", "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize",
];
const RECORD_REPRS: &[&str] = &["C", "transparent"];

#[proc_macro_derive(DeviceCopy)]
pub fn derive_device_copy(input: BaseTokenStream) -> BaseTokenStream {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return BaseTokenStream::from(err.to_compile_error()),
    };
    let gen = match check_repr(&ast) {
        Ok(()) => impl_device_copy(&ast),
        Err(err) => err.to_compile_error(),
    };
    BaseTokenStream::from(gen)
}

fn check_repr(input: &DeriveInput) -> syn::Result<()> {
    let (allowed, kind, hint) = match input.data {
        Data::Enum(_) => (ENUM_REPRS, "enum", "#[repr(C)] or a primitive integer repr"),
        Data::Struct(_) => (RECORD_REPRS, "struct", "#[repr(C)] or #[repr(transparent)]"),
        Data::Union(_) => (RECORD_REPRS, "union", "#[repr(C)] or #[repr(transparent)]"),
    };

    let found = repr_words(&input.attrs)
        .iter()
        .any(|word| allowed.iter().any(|a| word == a));
    if found {
        Ok(())
    } else {
        let msg = format!(
            "DeviceCopy {} `{}` must have a fixed layout; add {}",
            kind, input.ident, hint
        );
        Err(syn::Error::new_spanned(&input.ident, msg))
    }
}

/// Collects the bare words out of every `#[repr(...)]` attribute, e.g. `C` and `packed`.
fn repr_words(attrs: &[Attribute]) -> Vec<String> {
    let mut words = vec![];
    for attr in attrs {
        if let Ok(Meta::List(list)) = attr.parse_meta() {
            if list.ident != "repr" {
                continue;
            }
            for nested in list.nested.iter() {
                if let NestedMeta::Meta(Meta::Word(ref word)) = *nested {
                    words.push(word.to_string());
                }
            }
        }
    }
    words
}

fn impl_device_copy(input: &DeriveInput) -> TokenStream {
    let input_type = &input.ident;

    // Every field type is asserted to be DeviceCopy inside a hidden function.
    let check_types_code = match input.data {
        Data::Struct(ref data_struct) => type_check_struct(data_struct),
        Data::Enum(ref data_enum) => type_check_enum(data_enum),
        Data::Union(ref data_union) => type_check_union(data_union),
    };

    let type_test_func_name = format!("__verify_{}_can_implement_DeviceCopy", input_type);
    let type_test_func_ident = Ident::new(&type_test_func_name, Span::call_site());

    let generics = add_bound_to_generics(&input.generics);
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    quote! {
        unsafe impl #impl_generics ::gpumap::DeviceCopy for #input_type #type_generics #where_clause {}

        #[doc(hidden)]
        #[allow(non_snake_case, dead_code, unused_variables)]
        fn #type_test_func_ident #impl_generics(value: &#input_type #type_generics) #where_clause {
            #check_types_code
        }
    }
}

fn add_bound_to_generics(generics: &Generics) -> Generics {
    let mut new_generics = generics.clone();
    let bound: TypeParamBound = match parse_str("::gpumap::DeviceCopy") {
        Ok(bound) => bound,
        Err(_) => return new_generics,
    };

    for type_param in new_generics.type_params_mut() {
        type_param.bounds.push(bound.clone())
    }

    new_generics
}

fn fields_of(fields: &Fields) -> Vec<&Field> {
    match *fields {
        Fields::Named(ref named) => named.named.iter().collect(),
        Fields::Unnamed(ref unnamed) => unnamed.unnamed.iter().collect(),
        Fields::Unit => vec![],
    }
}

fn type_check_struct(s: &DataStruct) -> TokenStream {
    let checks = check_fields(&fields_of(&s.fields));
    quote!(
        #(#checks)*
    )
}

fn type_check_enum(e: &DataEnum) -> TokenStream {
    let checks: Vec<TokenStream> = e
        .variants
        .iter()
        .flat_map(|variant| check_fields(&fields_of(&variant.fields)))
        .collect();
    quote!(
        #(#checks)*
    )
}

fn type_check_union(u: &DataUnion) -> TokenStream {
    let fields: Vec<&Field> = u.fields.named.iter().collect();
    let checks = check_fields(&fields);
    quote!(
        #(#checks)*
    )
}

fn check_fields(fields: &[&Field]) -> Vec<TokenStream> {
    fields
        .iter()
        .map(|field| {
            let field_type = &field.ty;
            quote! {
                {
                    fn assert_impl<T: ::gpumap::DeviceCopy>() {}
                    assert_impl::<#field_type>();
                }
            }
        })
        .collect()
}
