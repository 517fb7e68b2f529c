//! Stub body generation: turns one [`Signature`] into an out-of-line definition
//! that copies its parameters into the conventional parameter aggregate and
//! hands it to the name-based dispatch call.
//!
//! The aggregate type (`<Class>_<Function>_Params`) and the dispatch runtime are
//! external; nothing here checks that they exist.

use crate::types::Signature;

/// Generator name written into every marker comment.
pub const GENERATOR_NAME: &str = "bodygen";

const INDENT: &str = "    ";

/// Conventional name of the parameter aggregate for `class_name::function_name`.
pub fn params_struct_name(class_name: &str, function_name: &str) -> String {
    format!("{class_name}_{function_name}_Params")
}

/// Split a raw parameter list on every `,`. Commas inside templates or default
/// arguments split too.
pub fn split_params(params: &str) -> impl Iterator<Item = &str> {
    params.split(',').map(str::trim).filter(|p| !p.is_empty())
}

/// The identifier of one parameter: the text after its last space.
///
/// `AActor* Target` gives `Target`; `AActor *Target` gives `*Target`. A segment
/// with no space at all (an unnamed `int`) has no identifier.
pub fn param_ident(param: &str) -> Option<&str> {
    param.rfind(' ').map(|i| &param[i + 1..])
}

/// The one dispatch statement every stub ends with, minus indentation.
pub fn dispatch_call(function_name: &str) -> String {
    format!("ProcessEvent(FindFunctionChecked(FName(TEXT(\"{function_name}\"))), &params);")
}

/// Build the statements inside the braces of a stub.
///
/// The first line carries no indentation; the caller supplies it so the body can
/// be spliced after an indented `{` line.
pub fn generate_body(return_type: &str, class_name: &str, function_name: &str, params: &str) -> String {
    let mut body = String::with_capacity(256);
    body.push_str(&params_struct_name(class_name, function_name));
    body.push_str(" params;\n");

    for ident in split_params(params).filter_map(param_ident) {
        body.push_str(&format!("{INDENT}params.{ident} = {ident};\n"));
    }

    body.push_str(INDENT);
    body.push_str(&dispatch_call(function_name));
    body.push('\n');

    if return_type.trim() != "void" {
        body.push_str(INDENT);
        body.push_str("return params.ReturnValue;\n");
    }
    body
}

/// Render the full out-of-line definition for one signature: marker comment,
/// qualified header, braced body and a trailing blank line.
pub fn generate_definition(class_name: &str, sig: &Signature) -> String {
    let mut out = String::with_capacity(384);
    out.push_str(&format!(
        "// auto-generated function for {}(by {GENERATOR_NAME})\n",
        sig.function_name
    ));
    out.push_str(&format!(
        "{} {class_name}::{}({})\n",
        sig.return_type, sig.function_name, sig.parameter_list
    ));
    out.push_str("{\n");
    out.push_str(INDENT);
    out.push_str(&generate_body(
        &sig.return_type,
        class_name,
        &sig.function_name,
        &sig.parameter_list,
    ));
    out.push_str("}\n\n");
    out
}
