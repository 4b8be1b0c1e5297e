/// The C runtime library the generated code links against: its entry point
/// wrapper and the names of its line algebra functions.
pub trait Runtime {
    /// Everything up to and including the opening of `main`.
    const PROLOGUE: &str;
    /// Closes `main`.
    const EPILOGUE: &str;

    const PRINT: &str;

    const CONCATENATE: &str;
    const APPEND_ELEMENT: &str;
    const PREPEND_ELEMENT: &str;
    const APPEND_LINE: &str;
    const APPEND_REVERSED_TO_ELEMENT: &str;
    const APPEND_REVERSED_TO_LINE: &str;
    const REPEAT_LINE: &str;
    const REPEAT_ELEMENT: &str;
    const REVERSE_LINE: &str;
    const REVERSE_ELEMENT: &str;

    /// Variadic line builder taking `(tag, value)` pairs.
    const CREATE_LINE: &str;
    const ARG_ELEMENT: &str;
    const ARG_LINE: &str;
    /// Terminates the argument list of [`Runtime::CREATE_LINE`].
    const END_OF_ARGS: &str;

    /// Identifiers a variable may not be emitted as.
    const RESERVED: &phf::Set<&'static str>;
    /// Prepended to variable names found in [`Runtime::RESERVED`].
    const RESERVED_PREFIX: &str;
}

/// The accelerator elements runtime, allocating from an arena.
pub struct AccRuntime;

impl Runtime for AccRuntime {
    const PROLOGUE: &str = concat!(
        "#include <stdio.h>\n",
        "\n",
        "#include \"acc_elements.h\"\n",
        "#include \"sdm_lib.h\"\n",
        "\n",
        "static sdm_arena_t main_arena = {0};\n",
        "static sdm_arena_t *active_arena = &main_arena;\n",
        "\n",
        "void *active_alloc(size_t size)              { return sdm_arena_alloc(active_arena, size); }\n",
        "void *active_realloc(void *ptr, size_t size) { return sdm_arena_realloc(active_arena, ptr, size); }\n",
        "\n",
        "int main(void) {\n",
    );
    const EPILOGUE: &str = "\n\treturn 0;\n}\n";

    const PRINT: &str = "printf";

    const CONCATENATE: &str = "concatenate";
    const APPEND_ELEMENT: &str = "append_element";
    const PREPEND_ELEMENT: &str = "prepend_element";
    const APPEND_LINE: &str = "append_line";
    const APPEND_REVERSED_TO_ELEMENT: &str = "append_reversed_to_element";
    const APPEND_REVERSED_TO_LINE: &str = "append_reversed_to_line";
    const REPEAT_LINE: &str = "repeat_line";
    const REPEAT_ELEMENT: &str = "repeat_element";
    const REVERSE_LINE: &str = "reverse_line";
    const REVERSE_ELEMENT: &str = "reverse_element";

    const CREATE_LINE: &str = "create_line_with_elements";
    const ARG_ELEMENT: &str = "ARG_ELEMENT";
    const ARG_LINE: &str = "ARG_LINE";
    const END_OF_ARGS: &str = "-1";

    const RESERVED: &phf::Set<&'static str> = &ACC_RESERVED;
    const RESERVED_PREFIX: &str = "ll_";
}

/// C keywords and every global the translation unit declares or includes.
static ACC_RESERVED: phf::Set<&'static str> = phf::phf_set! {
    // C keywords
    "auto", "break", "case", "char", "const", "continue", "default", "do",
    "double", "else", "enum", "extern", "float", "for", "goto", "if",
    "inline", "int", "long", "register", "restrict", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while", "bool", "true", "false", "NULL",
    // Wrapper
    "main", "printf", "size_t", "main_arena", "active_arena", "active_alloc",
    "active_realloc", "sdm_arena_t", "sdm_arena_alloc", "sdm_arena_realloc",
    // Runtime
    "Element", "Line", "ARG_ELEMENT", "ARG_LINE", "create_line_with_elements",
    "concatenate", "append_element", "prepend_element", "append_line",
    "append_reversed_to_element", "append_reversed_to_line", "repeat_line",
    "repeat_element", "reverse_line", "reverse_element", "make_drift",
    "make_quad", "make_sbend", "make_sext", "make_oct", "make_cavity",
    "make_marker",
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{Lowering, STANDARD};

    #[test]
    fn constructors_are_reserved() {
        for builtin in STANDARD {
            if let Lowering::Constructor(name) = builtin.lowering {
                assert!(AccRuntime::RESERVED.contains(name), "{name}");
            }
        }
        assert!(AccRuntime::RESERVED.contains(AccRuntime::REPEAT_LINE));
        assert!(!AccRuntime::RESERVED.contains("q1"));
    }
}
