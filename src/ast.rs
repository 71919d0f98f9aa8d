#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub schema: SchemaDecl,
    pub fds: Vec<DependencyDecl>,
    pub mvds: Vec<DependencyDecl>,
    /// List items dropped for lacking an arrow
    pub malformed: usize,
}

/// `R(A, B, C)`
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDecl {
    pub name: String,
    pub attributes: Vec<String>,
}

/// One `A, B -> C` item. Either side may be empty when the source was.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DependencyDecl {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl DependencyDecl {
    pub fn new<L, R>(left: L, right: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            left: left.into_iter().map(Into::into).collect(),
            right: right.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Functional,   // ->
    Multivalued,  // ->->
}

/// A `;`-separated list of dependencies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DependencyList {
    pub items: Vec<DependencyDecl>,
    pub malformed: usize,
}
