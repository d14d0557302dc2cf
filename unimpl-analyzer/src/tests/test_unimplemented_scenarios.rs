//! End-to-end scenarios over parsed sources

use super::{check, summarize};
use crate::{Severity, UNIMPLEMENTED_INTERFACE};
use pretty_assertions::assert_eq;

fn expected(message: &str, location: &str) -> Vec<(String, String)> {
    vec![(message.to_string(), location.to_string())]
}

#[test]
fn test_empty_source_has_no_findings() {
    assert!(check(&[""]).is_empty());
}

#[test]
fn test_single_file_same_namespace() {
    let diagnostics = check(&[r#"
    namespace N
    {
        public interface IInterface
        {
            int A { get; }
        }

        public class Implementation: IInterface
        {
            public int A { get; } = 10;
        }
    }"#]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_multi_file_same_namespace() {
    let diagnostics = check(&[
        r#"
namespace N
{
    public interface IInterface
    {
        int A { get; }
    }
}"#,
        r#"
namespace N
{
    public class Implementation: IInterface
    {
        public int A { get; } = 10;
    }
}"#,
    ]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_multi_file_different_namespace() {
    let diagnostics = check(&[
        r#"
namespace N
{
    public interface IInterface
    {
        int A { get; }
    }
}"#,
        r#"
namespace M
{
    using N;
    public class Implementation: IInterface
    {
        public int A { get; } = 10;
    }
}"#,
    ]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_single_file_separate_namespaces() {
    let diagnostics = check(&[r#"
    namespace N
    {
        namespace Abstractions
        {
            public interface IInterface
            {
                int A { get; }
            }
        }

        namespace Foo
        {
            using Abstractions;

            public class Implementation: IInterface
            {
                public int A { get; } = 10;
            }
        }
    }"#]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_shadowed_interface_is_reported() {
    let diagnostics = check(&[r#"
namespace N
{
    public interface IInterface
    {
        int A { get; }
    }

    namespace Abstractions
    {
        public interface IInterface
        {
            long B { get; }
        }


        public class Implementation : IInterface
        {
            public int A { get; } = 10;
            public long B { get; } = 456;
        }
    }
}"#]);

    assert_eq!(
        summarize(&diagnostics),
        expected("Interface 'N.IInterface' is not implemented", "Test0.cs:4:22")
    );
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
    assert_eq!(diagnostics[0].rule.id, UNIMPLEMENTED_INTERFACE.id);
}

#[test]
fn test_fully_qualified_reference_marks_outer_interface() {
    let diagnostics = check(&[r#"
namespace N
{
    public interface IInterface
    {
        int A { get; }
    }

    namespace Abstractions
    {
        public interface IInterface
        {
            long B { get; }
        }


        public class Implementation : N.IInterface
        {
            public int A { get; } = 10;
            public long B { get; } = 456;
        }
    }
}"#]);

    assert_eq!(
        summarize(&diagnostics),
        expected(
            "Interface 'N.Abstractions.IInterface' is not implemented",
            "Test0.cs:11:26"
        )
    );
}

#[test]
fn test_global_namespace_interface_has_no_qualifier() {
    let diagnostics = check(&["public interface IInterface { }"]);

    assert_eq!(
        summarize(&diagnostics),
        expected("Interface 'IInterface' is not implemented", "Test0.cs:1:18")
    );
}

#[test]
fn test_partial_interface_implemented_once() {
    let diagnostics = check(&[
        "namespace N { public partial interface IPartial { void A(); } }",
        "namespace N { public partial interface IPartial { void B(); } }",
        "namespace N { public class Both : IPartial { public void A() {} public void B() {} } }",
    ]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_unimplemented_partial_interface_lists_other_fragments() {
    let diagnostics = check(&[
        "namespace N\n{\n    public partial interface IPartial { }\n}",
        "namespace N\n{\n    partial interface IPartial { }\n}",
    ]);

    assert_eq!(
        summarize(&diagnostics),
        expected("Interface 'N.IPartial' is not implemented", "Test0.cs:3:30")
    );
    let secondary: Vec<String> = diagnostics[0]
        .additional_locations
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(secondary, vec!["Test1.cs:3:23"]);
}

#[test]
fn test_each_unimplemented_interface_reported_once() {
    let diagnostics = check(&[
        "namespace N { interface IOne {} interface ITwo {} class Impl : ITwo {} }",
        "namespace N { interface IThree {} }",
    ]);

    let messages: Vec<String> = diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "Interface 'N.IOne' is not implemented",
            "Interface 'N.IThree' is not implemented",
        ]
    );
}

#[test]
fn test_structs_and_records_implement_interfaces() {
    let diagnostics = check(&[r#"
namespace Shapes
{
    public interface IShape { double Area(); }
    public interface IEntity { int Id { get; } }
    public interface IValue { }

    public readonly struct Square : IShape
    {
        public double Area() => 1.0;
    }

    public record Person(int Id) : IEntity;
    public record struct Money(decimal Amount) : IValue;
}"#]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_interface_only_extended_by_other_interface() {
    let diagnostics = check(&[
        "interface IBase {} interface IDerived : IBase {} class Impl : IDerived {}",
        "interface ILonely {} interface IExtendsLonely : ILonely {}",
    ]);

    let messages: Vec<String> = diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "Interface 'ILonely' is not implemented",
            "Interface 'IExtendsLonely' is not implemented",
        ]
    );
}

#[test]
fn test_inherited_implementation_through_base_class() {
    let diagnostics = check(&[r#"
namespace N
{
    public interface IRepository { }
    public abstract class RepositoryBase : IRepository { }
    public sealed class UserRepository : RepositoryBase { }
}"#]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_external_base_types_are_ignored() {
    let diagnostics = check(&[r#"
using System;
using System.Collections.Generic;

namespace N
{
    public interface IHandle : IDisposable { }
    public class Handle : List<int>, IHandle, IEquatable<Handle>
    {
        public void Dispose() { }
        public bool Equals(Handle other) => true;
    }
}"#]);

    assert!(diagnostics.is_empty());
}

#[test]
fn test_enums_and_delegates_do_not_implement() {
    let diagnostics = check(&[r#"
namespace N
{
    public interface IFlag { }
    public enum Flags : byte { A = 1, B = 2 }
    public delegate IFlag Factory(string name);
}"#]);

    assert_eq!(
        summarize(&diagnostics),
        expected("Interface 'N.IFlag' is not implemented", "Test0.cs:4:22")
    );
}
