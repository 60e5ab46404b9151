//! Type-name resolution for declared signatures.
//!
//! Maps a [`TypeRef`] as written in one compilation unit to the qualified
//! binary name a mapping file would use. Resolution is syntactic; it sees the
//! unit itself plus a [`TypeIndex`] of every type declared in the source tree:
//!
//! 1. primitives and `void` stay as written
//! 2. type variables erase to their first bound, or `java.lang.Object`
//! 3. the first name segment is looked up in order among member types of the
//!    enclosing types, types declared in the unit, single-type imports, types
//!    the tree declares in the unit's package, on-demand imports, and
//!    well-known `java.lang` types
//! 4. a dotted name whose first segment is lowercase is taken as qualified
//! 5. anything else is assumed to live in the unit's package
//!
//! An on-demand import matches a type the tree declares in that package or
//! type, or a member of a small table of common JDK packages. Wildcard imports
//! of any other package outside the tree are invisible, so a type they supply
//! falls through to step 5 and gets the unit's package.
//!
//! Segments after the resolved head are nested types and join with `$`.
//! Array dimensions are appended as `[]`.

use std::collections::{HashMap, HashSet};

use crate::parser::{CompilationUnit, DeclShape, TypeParam, TypeRef};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const JAVA_LANG: &[&str] = &[
    "AbstractMethodError",
    "Appendable",
    "ArithmeticException",
    "ArrayIndexOutOfBoundsException",
    "AssertionError",
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassCastException",
    "ClassLoader",
    "ClassNotFoundException",
    "CloneNotSupportedException",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "FunctionalInterface",
    "IllegalArgumentException",
    "IllegalStateException",
    "IndexOutOfBoundsException",
    "Integer",
    "InterruptedException",
    "Iterable",
    "Long",
    "Math",
    "NullPointerException",
    "Number",
    "NumberFormatException",
    "Object",
    "OutOfMemoryError",
    "Override",
    "Process",
    "Readable",
    "Record",
    "ReflectiveOperationException",
    "Runnable",
    "Runtime",
    "RuntimeException",
    "SafeVarargs",
    "SecurityException",
    "Short",
    "StackOverflowError",
    "StackTraceElement",
    "StrictMath",
    "String",
    "StringBuffer",
    "StringBuilder",
    "SuppressWarnings",
    "System",
    "Thread",
    "ThreadLocal",
    "Throwable",
    "UnsupportedOperationException",
    "Void",
];

/// Members of commonly wildcard-imported JDK packages.
const JDK_ON_DEMAND: &[(&str, &[&str])] = &[
    (
        "java.io",
        &[
            "BufferedReader",
            "BufferedWriter",
            "File",
            "FileInputStream",
            "FileOutputStream",
            "FileReader",
            "FileWriter",
            "IOException",
            "InputStream",
            "InputStreamReader",
            "OutputStream",
            "PrintStream",
            "PrintWriter",
            "Reader",
            "Serializable",
            "UncheckedIOException",
            "Writer",
        ],
    ),
    (
        "java.util",
        &[
            "ArrayList",
            "Arrays",
            "Collection",
            "Collections",
            "Comparator",
            "Deque",
            "EnumMap",
            "EnumSet",
            "HashMap",
            "HashSet",
            "Iterator",
            "LinkedHashMap",
            "LinkedHashSet",
            "LinkedList",
            "List",
            "Locale",
            "Map",
            "Objects",
            "Optional",
            "Queue",
            "Random",
            "Set",
            "SortedMap",
            "SortedSet",
            "TreeMap",
            "TreeSet",
            "UUID",
        ],
    ),
    (
        "java.util.function",
        &[
            "BiConsumer",
            "BiFunction",
            "BooleanSupplier",
            "Consumer",
            "Function",
            "IntFunction",
            "Predicate",
            "Supplier",
            "UnaryOperator",
        ],
    ),
];

const OBJECT: &str = "java.lang.Object";

/// Bound-chasing limit for `<A extends B, B extends A>`.
const MAX_BOUND_DEPTH: usize = 8;

/// Binary names of every named type declared across a set of units.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    names: HashSet<String>,
}

impl TypeIndex {
    pub fn new() -> Self {
        TypeIndex::default()
    }

    pub fn add_unit(&mut self, unit: &CompilationUnit) {
        self.names.extend(binary_names(unit).into_iter().flatten());
    }

    pub fn contains(&self, binary_name: &str) -> bool {
        self.names.contains(binary_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> FromIterator<&'a CompilationUnit> for TypeIndex {
    fn from_iter<I: IntoIterator<Item = &'a CompilationUnit>>(units: I) -> Self {
        let mut index = TypeIndex::new();
        for unit in units {
            index.add_unit(unit);
        }
        index
    }
}

/// Binary name per declaration index; `None` for anonymous types and
/// non-type declarations.
fn binary_names(unit: &CompilationUnit) -> Vec<Option<String>> {
    let mut names: Vec<Option<String>> = Vec::with_capacity(unit.decls.len());
    for decl in &unit.decls {
        let name = match (&decl.shape, decl.parent) {
            (DeclShape::Type { anonymous: true, .. }, _) => None,
            (DeclShape::Type { .. }, None) => Some(in_package(unit, &decl.name)),
            (DeclShape::Type { .. }, Some(parent)) => names[parent]
                .as_ref()
                .map(|outer| format!("{}${}", outer, decl.name)),
            _ => None,
        };
        names.push(name);
    }
    names
}

fn in_package(unit: &CompilationUnit, simple: &str) -> String {
    match &unit.package {
        Some(pkg) => format!("{}.{}", pkg, simple),
        None => simple.to_string(),
    }
}

/// Resolution context for one compilation unit.
#[derive(Debug)]
pub struct Resolver<'u> {
    unit: &'u CompilationUnit,
    index: &'u TypeIndex,
    binary_names: Vec<Option<String>>,
    /// Single-type imports by simple name.
    imports: HashMap<&'u str, String>,
    /// Paths of on-demand imports, static ones included.
    on_demand: Vec<&'u str>,
}

impl<'u> Resolver<'u> {
    /// `index` should cover `unit`; types it declares elsewhere in the tree
    /// become visible through the package and on-demand imports.
    pub fn new(unit: &'u CompilationUnit, index: &'u TypeIndex) -> Self {
        let binary_names = binary_names(unit);

        let imports = unit
            .imports
            .iter()
            .filter(|i| !i.is_static && !i.on_demand)
            .filter_map(|i| {
                let simple = i.path.rsplit('.').next()?;
                Some((simple, qualified_binary_name(&i.path)))
            })
            .collect();

        let on_demand = unit
            .imports
            .iter()
            .filter(|i| i.on_demand)
            .map(|i| i.path.as_str())
            .collect();

        Resolver {
            unit,
            index,
            binary_names,
            imports,
            on_demand,
        }
    }

    /// Binary name of a type declaration.
    pub fn binary_name(&self, index: usize) -> Option<&str> {
        self.binary_names.get(index).and_then(|n| n.as_deref())
    }

    /// Resolve `ty` as written inside declaration `context`.
    ///
    /// `context` is a method or type declaration; its own type parameters and
    /// those of every enclosing type are in scope.
    pub fn resolve(&self, ty: &TypeRef, context: usize) -> String {
        self.resolve_bounded(ty, context, 0)
    }

    fn resolve_bounded(&self, ty: &TypeRef, context: usize, depth: usize) -> String {
        let element = self.resolve_element(&ty.name, context, depth);
        let mut out = element;
        for _ in 0..ty.dims {
            out.push_str("[]");
        }
        out
    }

    fn resolve_element(&self, name: &str, context: usize, depth: usize) -> String {
        let segments: Vec<&str> = name.split('.').collect();
        let head = segments[0];

        if segments.len() == 1 && PRIMITIVES.contains(&head) {
            return head.to_string();
        }

        if segments.len() == 1 {
            if let Some(param) = self.type_param(head, context) {
                return match &param.bound {
                    Some(bound) if depth < MAX_BOUND_DEPTH => {
                        self.resolve_bounded(bound, context, depth + 1)
                    }
                    _ => OBJECT.to_string(),
                };
            }
        }

        let resolved_head = self
            .member_type(head, context)
            .or_else(|| self.top_level_type(head))
            .or_else(|| self.imports.get(head).cloned())
            .or_else(|| self.package_type(head))
            .or_else(|| self.on_demand_type(head))
            .or_else(|| {
                JAVA_LANG
                    .contains(&head)
                    .then(|| format!("java.lang.{}", head))
            });

        let mut out = match resolved_head {
            Some(out) => out,
            None if segments.len() > 1 && starts_lowercase(head) => {
                return qualified_binary_name(name)
            }
            None => in_package(self.unit, head),
        };
        for nested in &segments[1..] {
            out.push('$');
            out.push_str(nested);
        }
        out
    }

    /// A type the tree declares in the unit's own package.
    fn package_type(&self, name: &str) -> Option<String> {
        let candidate = in_package(self.unit, name);
        self.index.contains(&candidate).then_some(candidate)
    }

    /// A type supplied by `import pkg.*;` or `import [static] pkg.Type.*;`.
    fn on_demand_type(&self, name: &str) -> Option<String> {
        for path in &self.on_demand {
            let in_tree_package = format!("{}.{}", path, name);
            if self.index.contains(&in_tree_package) {
                return Some(in_tree_package);
            }
            let member = format!("{}${}", qualified_binary_name(path), name);
            if self.index.contains(&member) {
                return Some(member);
            }
        }
        self.on_demand.iter().find_map(|path| {
            JDK_ON_DEMAND
                .iter()
                .find(|(pkg, members)| pkg == path && members.contains(&name))
                .map(|(pkg, _)| format!("{}.{}", pkg, name))
        })
    }

    /// Innermost type parameter named `name` visible from `context`.
    fn type_param(&self, name: &str, context: usize) -> Option<&'u TypeParam> {
        let unit = self.unit;
        let mut current = Some(context);
        while let Some(idx) = current {
            let decl = &unit.decls[idx];
            let params: &[TypeParam] = match &decl.shape {
                DeclShape::Type { type_params, .. } | DeclShape::Method { type_params, .. } => {
                    type_params.as_slice()
                }
                DeclShape::Field { .. } => &[],
            };
            if let Some(param) = params.iter().find(|p| p.name == name) {
                return Some(param);
            }
            current = decl.parent;
        }
        None
    }

    /// A type named `name` that is, or is a member of, an enclosing type.
    fn member_type(&self, name: &str, context: usize) -> Option<String> {
        let mut current = match self.unit.decls[context].shape {
            DeclShape::Type { .. } => Some(context),
            _ => self.unit.decls[context].parent,
        };
        while let Some(idx) = current {
            let found = self.unit.decls.iter().enumerate().find(|(i, d)| {
                d.parent == Some(idx) && d.name == name && self.binary_names[*i].is_some()
            });
            if let Some((i, _)) = found {
                return self.binary_names[i].clone();
            }
            if self.unit.decls[idx].name == name {
                if let Some(own) = &self.binary_names[idx] {
                    return Some(own.clone());
                }
            }
            current = self.unit.decls[idx].parent;
        }
        None
    }

    fn top_level_type(&self, name: &str) -> Option<String> {
        self.unit
            .decls
            .iter()
            .enumerate()
            .find(|(_, d)| d.parent.is_none() && d.name == name)
            .and_then(|(i, _)| self.binary_names[i].clone())
    }
}

fn starts_lowercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_lowercase)
}

/// `java.util.Map.Entry` -> `java.util.Map$Entry`: segments after the first
/// capitalized one are nested types.
fn qualified_binary_name(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_type = false;
    for (i, segment) in path.split('.').enumerate() {
        if i > 0 {
            out.push(if in_type { '$' } else { '.' });
        }
        out.push_str(segment);
        if !starts_lowercase(segment) {
            in_type = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn resolve_params(source: &str, method: &str) -> Vec<String> {
        resolve_params_in(&[], source, method)
    }

    /// Resolve with `others` declared elsewhere in the same tree.
    fn resolve_params_in(others: &[&str], source: &str, method: &str) -> Vec<String> {
        let unit = parse(source).unwrap();
        let others: Vec<CompilationUnit> = others.iter().map(|s| parse(s).unwrap()).collect();
        let index: TypeIndex = others.iter().chain([&unit]).collect();
        let resolver = Resolver::new(&unit, &index);
        let (idx, decl) = unit
            .decls
            .iter()
            .enumerate()
            .find(|(_, d)| d.name == method)
            .unwrap();
        let DeclShape::Method { params, ret, .. } = &decl.shape else {
            panic!("not a method");
        };
        let mut out: Vec<String> = params.iter().map(|p| resolver.resolve(p, idx)).collect();
        out.push(resolver.resolve(ret, idx));
        out
    }

    mod binary_names {
        use super::*;

        #[test]
        fn nested_types_use_dollar() {
            let unit = parse("package a.b; class Outer { class Inner { class Deep {} } }").unwrap();
            let index = TypeIndex::new();
            let resolver = Resolver::new(&unit, &index);
            assert_eq!(resolver.binary_name(0), Some("a.b.Outer"));
            assert_eq!(resolver.binary_name(1), Some("a.b.Outer$Inner"));
            assert_eq!(resolver.binary_name(2), Some("a.b.Outer$Inner$Deep"));
        }

        #[test]
        fn default_package() {
            let unit = parse("class Top {}").unwrap();
            let index = TypeIndex::new();
            assert_eq!(Resolver::new(&unit, &index).binary_name(0), Some("Top"));
        }

        #[test]
        fn anonymous_bodies_have_no_name() {
            let unit = parse("enum E { A { void f() {} }; }").unwrap();
            let index = TypeIndex::new();
            let resolver = Resolver::new(&unit, &index);
            assert_eq!(resolver.binary_name(0), Some("E"));
            assert_eq!(resolver.binary_name(1), None);
            assert_eq!(resolver.binary_name(2), None);
        }

        #[test]
        fn index_holds_named_types_only() {
            let unit = parse("package a; class Outer { class Inner {} void f() {} Object o = new Object() {}; }")
                .unwrap();
            let index: TypeIndex = [&unit].into_iter().collect();
            assert_eq!(index.len(), 2);
            assert!(index.contains("a.Outer"));
            assert!(index.contains("a.Outer$Inner"));
            assert!(!index.contains("a.Inner"));
            assert!(TypeIndex::new().is_empty());
        }

        #[test]
        fn qualified_nested_heuristic() {
            assert_eq!(qualified_binary_name("java.util.Map.Entry"), "java.util.Map$Entry");
            assert_eq!(qualified_binary_name("a.b.c"), "a.b.c");
        }
    }

    mod signatures {
        use super::*;

        #[test]
        fn primitives_arrays_and_java_lang() {
            assert_eq!(
                resolve_params("class A { String m(int a, long[] b, Object... c) { } }", "m"),
                vec!["int", "long[]", "java.lang.Object[]", "java.lang.String"]
            );
        }

        #[test]
        fn imports_and_qualified_names() {
            assert_eq!(
                resolve_params(
                    "package p; import java.util.List; import java.util.Map;\n\
                     class A { void m(List<String> a, Map.Entry<K, V> b, java.io.File c) { } }",
                    "m"
                ),
                vec![
                    "java.util.List",
                    "java.util.Map$Entry",
                    "java.io.File",
                    "void"
                ]
            );
        }

        #[test]
        fn unit_declared_and_same_package_types() {
            assert_eq!(
                resolve_params(
                    "package a.b; class Old { static class Inner {} Old m(Inner i, Other o, Old.Inner j) { } }",
                    "m"
                ),
                vec!["a.b.Old$Inner", "a.b.Other", "a.b.Old$Inner", "a.b.Old"]
            );
        }

        #[test]
        fn member_type_of_outer_is_visible_from_sibling() {
            assert_eq!(
                resolve_params(
                    "package p; class Outer { class Key {} class Map { void put(Key k) {} } }",
                    "put"
                ),
                vec!["p.Outer$Key", "void"]
            );
        }

        #[test]
        fn type_variables_erase_to_bounds() {
            assert_eq!(
                resolve_params(
                    "package p; class Box<T> { <U extends Number, V extends U> T m(U u, V v, T[] ts) { } }",
                    "m"
                ),
                vec![
                    "java.lang.Number",
                    "java.lang.Number",
                    "java.lang.Object[]",
                    "java.lang.Object"
                ]
            );
        }

        #[test]
        fn cyclic_bounds_terminate() {
            let params = resolve_params("class A { <X extends Y, Y extends X> void m(X x) { } }", "m");
            assert_eq!(params[0], OBJECT);
        }

        #[test]
        fn static_single_imports_are_not_type_imports() {
            assert_eq!(
                resolve_params(
                    "package p; import static q.Util.Helper; class A { void m(Helper h) { } }",
                    "m"
                ),
                vec!["p.Helper", "void"]
            );
        }
    }

    mod on_demand {
        use super::*;

        #[test]
        fn package_declared_in_tree() {
            assert_eq!(
                resolve_params_in(
                    &["package q; public class Widget { public static class Part {} }"],
                    "package p; import q.*; class A { void m(Widget w, Widget.Part p, Gadget g) { } }",
                    "m"
                ),
                vec!["q.Widget", "q.Widget$Part", "p.Gadget", "void"]
            );
        }

        #[test]
        fn member_types_of_tree_type() {
            assert_eq!(
                resolve_params_in(
                    &["package q; public class Widget { public static class Part {} }"],
                    "package p; import q.Widget.*; import static q.Widget.*; class A { void m(Part p) { } }",
                    "m"
                ),
                vec!["q.Widget$Part", "void"]
            );
        }

        #[test]
        fn common_jdk_packages() {
            assert_eq!(
                resolve_params(
                    "import java.util.*; import java.io.*; class Old { void m(List l, File f, Stream s) {} }",
                    "m"
                ),
                vec!["java.util.List", "java.io.File", "Stream", "void"]
            );
        }

        #[test]
        fn same_package_types_shadow_wildcards() {
            assert_eq!(
                resolve_params_in(
                    &["package p; class List {}", "package p; class String {}"],
                    "package p; import java.util.*; class A { void m(List l, Map m, String s) { } }",
                    "m"
                ),
                vec!["p.List", "java.util.Map", "p.String", "void"]
            );
        }

        #[test]
        fn single_type_import_beats_wildcard() {
            assert_eq!(
                resolve_params_in(
                    &["package q; public class List {}"],
                    "package p; import q.List; import java.util.*; class A { void m(List l) { } }",
                    "m"
                ),
                vec!["q.List", "void"]
            );
        }
    }
}
