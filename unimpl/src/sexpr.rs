// S-expression formatter for declaration ASTs
// Prints the namespace/type skeleton of a source file in a compact Lisp-like form

use unimpl_parser::*;

pub fn format_source_file_as_sexpr(file: &SourceFile) -> String {
    let mut parts: Vec<String> = file.usings.iter().map(format_using).collect();
    parts.extend(file.members.iter().map(|member| format_member_with_indent(member, 2)));

    if parts.is_empty() {
        "(file)".to_string()
    } else {
        format!("(file\n  {})", parts.join("\n  "))
    }
}

fn format_member_with_indent(member: &NamespaceMember, indent: usize) -> String {
    match member {
        NamespaceMember::Namespace(namespace) => format_namespace_with_indent(namespace, indent),
        NamespaceMember::Type(decl) => format_type_with_indent(decl, indent),
    }
}

fn format_namespace_with_indent(namespace: &NamespaceDecl, indent: usize) -> String {
    let keyword = if namespace.file_scoped {
        "namespace;"
    } else {
        "namespace"
    };
    let children: Vec<String> = namespace
        .usings
        .iter()
        .map(format_using)
        .chain(
            namespace
                .members
                .iter()
                .map(|member| format_member_with_indent(member, indent + 2)),
        )
        .collect();

    if children.is_empty() {
        format!("({} {})", keyword, namespace.name)
    } else {
        let padding = " ".repeat(indent + 2);
        format!(
            "({} {}\n{}{})",
            keyword,
            namespace.name,
            padding,
            children.join(&format!("\n{}", padding))
        )
    }
}

fn format_using(using: &UsingDirective) -> String {
    let prefix = if using.is_global { "global-using" } else { "using" };
    match &using.kind {
        UsingKind::Namespace(name) => format!("({} {})", prefix, name),
        UsingKind::Static(target) => format!("({} static {})", prefix, target),
        UsingKind::Alias { alias, target } => format!("({} {} = {})", prefix, alias, target),
    }
}

fn format_type_with_indent(decl: &TypeDecl, indent: usize) -> String {
    let mut head = format!("({} {}", kind_keyword(decl.kind), decl.name);
    if !decl.type_parameters.is_empty() {
        let parameters: Vec<&str> = decl
            .type_parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        head.push_str(&format!(" (params {})", parameters.join(" ")));
    }
    if decl.is_partial() {
        head.push_str(" partial");
    }
    if !decl.bases.is_empty() {
        let bases: Vec<String> = decl.bases.iter().map(ToString::to_string).collect();
        head.push_str(&format!(" (bases {})", bases.join(" ")));
    }

    if decl.nested.is_empty() {
        format!("{})", head)
    } else {
        let padding = " ".repeat(indent + 2);
        let nested: Vec<String> = decl
            .nested
            .iter()
            .map(|nested| format_type_with_indent(nested, indent + 2))
            .collect();
        format!("{}\n{}{})", head, padding, nested.join(&format!("\n{}", padding)))
    }
}

fn kind_keyword(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Interface => "interface",
        DeclKind::Class => "class",
        DeclKind::Struct => "struct",
        DeclKind::Record => "record",
        DeclKind::RecordStruct => "record-struct",
        DeclKind::Enum => "enum",
        DeclKind::Delegate => "delegate",
    }
}
