// Declaration parser
// Builds the declaration AST from pest pairs

use crate::ast::*;
use crate::error::{named_source, to_source_span, ParseError, ParseResult};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct DeclarationParser;

impl DeclarationParser {
    /// Parse a complete source file
    pub fn parse_source_file(name: &str, input: &str) -> ParseResult<SourceFile> {
        let mut pairs = Self::parse(Rule::compilation_unit, input)
            .map_err(|error| ParseError::from_pest(error, name, input))?;

        let builder = AstBuilder {
            name,
            source: input,
        };

        match pairs.next() {
            Some(unit) => builder.build_compilation_unit(unit),
            None => Err(builder.missing(Span::new(0, input.len()), "compilation unit")),
        }
    }
}

/// Carries the source so that structural errors can point back into it
struct AstBuilder<'s> {
    name: &'s str,
    source: &'s str,
}

impl AstBuilder<'_> {
    fn span_from_pair(pair: &Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::with_line_col(
            span.start(),
            span.end(),
            span.start_pos().line_col(),
            span.end_pos().line_col(),
        )
    }

    fn missing(&self, span: Span, expected: &str) -> ParseError {
        ParseError::MissingElement {
            src: named_source(self.name, self.source),
            span: to_source_span(span),
            expected: expected.to_string(),
        }
    }

    fn unexpected(&self, pair: &Pair<Rule>, expected: &str) -> ParseError {
        ParseError::UnexpectedRule {
            src: named_source(self.name, self.source),
            span: to_source_span(Self::span_from_pair(pair)),
            expected: expected.to_string(),
            found: pair.as_rule(),
        }
    }

    /// First direct child of `pair` matching `rule`
    fn child<'i>(&self, pair: &Pair<'i, Rule>, rule: Rule, expected: &str) -> ParseResult<Pair<'i, Rule>> {
        pair.clone()
            .into_inner()
            .find(|inner| inner.as_rule() == rule)
            .ok_or_else(|| self.missing(Self::span_from_pair(pair), expected))
    }

    fn build_compilation_unit(&self, pair: Pair<Rule>) -> ParseResult<SourceFile> {
        let span = Self::span_from_pair(&pair);
        let mut usings = Vec::new();
        let mut members = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::using_directive => usings.push(self.build_using(inner)?),
                _ => {
                    if let Some(member) = self.build_namespace_member(inner)? {
                        members.push(member);
                    }
                }
            }
        }

        Ok(SourceFile {
            name: self.name.to_string(),
            usings,
            members,
            span,
        })
    }

    /// Build a namespace member; pairs that carry no declaration yield `None`
    fn build_namespace_member(&self, pair: Pair<Rule>) -> ParseResult<Option<NamespaceMember>> {
        let member = match pair.as_rule() {
            Rule::namespace_decl => NamespaceMember::Namespace(self.build_namespace(pair, false)?),
            Rule::file_scoped_namespace => {
                NamespaceMember::Namespace(self.build_namespace(pair, true)?)
            }
            Rule::type_decl | Rule::enum_decl | Rule::delegate_decl => {
                NamespaceMember::Type(self.build_type_decl(pair)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(member))
    }

    fn build_namespace(&self, pair: Pair<Rule>, file_scoped: bool) -> ParseResult<NamespaceDecl> {
        let span = Self::span_from_pair(&pair);
        let name_pair = self.child(&pair, Rule::qualified_name, "namespace name")?;
        let name = self.build_qualified_name(name_pair)?;

        let mut usings = Vec::new();
        let mut members = Vec::new();
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::using_directive => usings.push(self.build_using(inner)?),
                _ => {
                    if let Some(member) = self.build_namespace_member(inner)? {
                        members.push(member);
                    }
                }
            }
        }

        Ok(NamespaceDecl {
            name,
            usings,
            members,
            file_scoped,
            span,
        })
    }

    fn build_using(&self, pair: Pair<Rule>) -> ParseResult<UsingDirective> {
        let span = Self::span_from_pair(&pair);
        let mut is_global = false;
        let mut kind = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::kw_global => is_global = true,
                Rule::using_namespace => {
                    let name = self.child(&inner, Rule::qualified_name, "namespace name")?;
                    kind = Some(UsingKind::Namespace(self.build_qualified_name(name)?));
                }
                Rule::using_static => {
                    let target = self.child(&inner, Rule::type_reference, "type name")?;
                    kind = Some(UsingKind::Static(self.build_type_reference(target)?));
                }
                Rule::using_alias => {
                    let alias = self.child(&inner, Rule::identifier, "alias name")?;
                    let target = self.child(&inner, Rule::type_reference, "alias target")?;
                    kind = Some(UsingKind::Alias {
                        alias: Self::build_identifier(&alias),
                        target: self.build_type_reference(target)?,
                    });
                }
                _ => {}
            }
        }

        let kind = kind.ok_or_else(|| self.missing(span, "using target"))?;
        Ok(UsingDirective {
            kind,
            is_global,
            span,
        })
    }

    fn build_identifier(pair: &Pair<Rule>) -> Identifier {
        let text = pair.as_str();
        Identifier {
            name: text.strip_prefix('@').unwrap_or(text).to_string(),
            span: Self::span_from_pair(pair),
        }
    }

    fn build_qualified_name(&self, pair: Pair<Rule>) -> ParseResult<QualifiedName> {
        let span = Self::span_from_pair(&pair);
        let mut is_global = false;
        let mut segments = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::global_prefix => is_global = true,
                Rule::identifier => segments.push(Self::build_identifier(&inner)),
                _ => return Err(self.unexpected(&inner, "identifier")),
            }
        }

        Ok(QualifiedName {
            is_global,
            segments,
            span,
        })
    }

    fn build_type_reference(&self, pair: Pair<Rule>) -> ParseResult<TypeRef> {
        let span = Self::span_from_pair(&pair);
        let mut is_global = false;
        let mut segments = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::global_prefix => is_global = true,
                Rule::type_segment => {
                    let name = self.child(&inner, Rule::identifier, "type name")?;
                    let arity = inner
                        .clone()
                        .into_inner()
                        .find(|part| part.as_rule() == Rule::type_arguments)
                        .map(|args| {
                            args.into_inner()
                                .filter(|arg| arg.as_rule() == Rule::type_argument)
                                .count()
                        })
                        .unwrap_or(0);
                    segments.push(TypeRefSegment {
                        name: Self::build_identifier(&name),
                        arity,
                    });
                }
                _ => {}
            }
        }

        Ok(TypeRef {
            is_global,
            segments,
            span,
        })
    }

    fn build_type_kind(&self, pair: Pair<Rule>) -> ParseResult<DeclKind> {
        let inner = self.child_any(&pair, "type kind")?;
        match inner.as_rule() {
            Rule::kind_interface => Ok(DeclKind::Interface),
            Rule::kind_class => Ok(DeclKind::Class),
            Rule::kind_struct => Ok(DeclKind::Struct),
            Rule::record_kind => {
                let is_struct = inner
                    .into_inner()
                    .any(|part| part.as_rule() == Rule::kind_struct);
                Ok(if is_struct {
                    DeclKind::RecordStruct
                } else {
                    DeclKind::Record
                })
            }
            _ => Err(self.unexpected(&inner, "interface, class, struct or record")),
        }
    }

    fn child_any<'i>(&self, pair: &Pair<'i, Rule>, expected: &str) -> ParseResult<Pair<'i, Rule>> {
        pair.clone()
            .into_inner()
            .next()
            .ok_or_else(|| self.missing(Self::span_from_pair(pair), expected))
    }

    /// Build an interface/class/struct/record, enum or delegate declaration
    fn build_type_decl(&self, pair: Pair<Rule>) -> ParseResult<TypeDecl> {
        let span = Self::span_from_pair(&pair);
        let mut kind = match pair.as_rule() {
            Rule::enum_decl => Some(DeclKind::Enum),
            Rule::delegate_decl => Some(DeclKind::Delegate),
            _ => None,
        };
        let mut name = None;
        let mut modifiers = Vec::new();
        let mut type_parameters = Vec::new();
        let mut bases = Vec::new();
        let mut nested = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::modifier => {
                    if let Some(modifier) = Modifier::from_keyword(inner.as_str()) {
                        modifiers.push(modifier);
                    }
                }
                Rule::type_kind => kind = Some(self.build_type_kind(inner)?),
                Rule::identifier if name.is_none() => name = Some(Self::build_identifier(&inner)),
                Rule::type_parameters => {
                    for parameter in inner.into_inner() {
                        if parameter.as_rule() == Rule::type_parameter {
                            let ident =
                                self.child(&parameter, Rule::identifier, "type parameter name")?;
                            type_parameters.push(Self::build_identifier(&ident));
                        }
                    }
                }
                Rule::base_list => {
                    for base in inner.into_inner() {
                        if base.as_rule() == Rule::base_type {
                            let reference = self.child(&base, Rule::type_reference, "base type")?;
                            bases.push(self.build_type_reference(reference)?);
                        }
                    }
                }
                Rule::type_body => {
                    for item in inner.into_inner() {
                        if let Some(NamespaceMember::Type(decl)) = self.build_namespace_member(item)? {
                            nested.push(decl);
                        }
                    }
                }
                _ => {}
            }
        }

        let kind = kind.ok_or_else(|| self.missing(span, "type kind"))?;
        let name = name.ok_or_else(|| self.missing(span, "type name"))?;

        Ok(TypeDecl {
            kind,
            name,
            modifiers,
            type_parameters,
            bases,
            nested,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> SourceFile {
        DeclarationParser::parse_source_file("test.cs", input).expect("source should parse")
    }

    #[test]
    fn test_identifier_strips_verbatim_prefix() {
        let file = parse("interface @class {}");
        let types = file.type_declarations();
        assert_eq!(types[0].name.name, "class");
    }

    #[test]
    fn test_identifier_span_has_line_and_column() {
        let file = parse("namespace N\n{\n    public interface IInterface {}\n}");
        let decl = file.type_declarations()[0];
        assert_eq!(decl.name.span.start_line_col, Some((3, 22)));
    }

    #[test]
    fn test_enum_underlying_type_is_not_a_base() {
        let file = parse("enum Color : byte { Red, Green = 2 }");
        let decl = file.type_declarations()[0];
        assert_eq!(decl.kind, DeclKind::Enum);
        assert!(decl.bases.is_empty());
    }

    #[test]
    fn test_delegate_return_type_is_not_the_name() {
        let file = parse("public delegate Task<int> Handler<T>(T value);");
        let decl = file.type_declarations()[0];
        assert_eq!(decl.kind, DeclKind::Delegate);
        assert_eq!(decl.name.name, "Handler");
        assert_eq!(decl.arity(), 1);
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let result = DeclarationParser::parse_source_file("broken.cs", "namespace N { interface }");
        let error = result.expect_err("missing interface name should fail");
        assert!(matches!(error, ParseError::PestError { .. }));
        assert!(error.span().offset() >= "namespace N { ".len());
    }
}
