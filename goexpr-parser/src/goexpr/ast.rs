//! Go syntax tree
//!
//! A deliberately plain tree: every node owns its children and carries a [`Span`] of byte
//! offsets into the buffer that was parsed. Positions of individual keywords and delimiters
//! (`if`, `{`, `:`) are kept where extraction needs them to cut a header out of a statement.
//!
//! Nodes that could not be parsed are represented by `Bad` variants spanning the skipped
//! input, so a tree is always available for whatever preceded the first error.

pub mod range;

use super::token::Token;
pub use range::{Position, SourceLocation, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub package: Ident,
    pub decls: Vec<Decl>,
    pub span: Span,
}

impl File {
    /// The first function declaration in the file, if any
    pub fn first_func(&self) -> Option<&FuncDecl> {
        self.decls.iter().find_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
    Bad(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<BlockStmt>,
    pub span: Span,
}

/// `var`, `const` or `type` declaration, at top level or inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub keyword: Token,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Value {
        names: Vec<Ident>,
        ty: Option<Expr>,
        values: Vec<Expr>,
    },
    Type {
        name: Ident,
        alias: bool,
        ty: Expr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    pub fields: Vec<Field>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub func_pos: Option<usize>,
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Bad,
    Ident(Ident),
    BasicLit {
        kind: Token,
        value: String,
    },
    CompositeLit {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
        lbrace: usize,
    },
    FuncLit {
        ty: FuncType,
        body: BlockStmt,
    },
    Paren(Box<Expr>),
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    /// `x[i]`, or `x[A, B]` for generic instantiation
    Index {
        x: Box<Expr>,
        indices: Vec<Expr>,
    },
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    /// `x.(T)`; `ty` is `None` for the `x.(type)` guard of a type switch
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
        ellipsis: Option<usize>,
    },
    Star(Box<Expr>),
    Unary {
        op: Token,
        x: Box<Expr>,
    },
    Binary {
        x: Box<Expr>,
        op: Token,
        y: Box<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// `...T` in a parameter list, or the `...` length of an array literal type
    Ellipsis(Option<Box<Expr>>),
    ArrayType {
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
    },
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType {
        dir: ChanDir,
        value: Box<Expr>,
    },
    FuncType(FuncType),
    StructType(FieldList),
    InterfaceType(FieldList),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn bad(span: Span) -> Self {
        Self::new(ExprKind::Bad, span)
    }

    /// Strip any number of enclosing parentheses
    pub fn unparen(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) => inner.unparen(),
            _ => self,
        }
    }

    /// True for `x.(type)`
    pub fn is_type_switch_guard(&self) -> bool {
        matches!(self.kind, ExprKind::TypeAssert { ty: None, .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    /// Offset of `{`, or `None` when the brace was missing
    pub lbrace: Option<usize>,
    pub list: Vec<Stmt>,
    pub rbrace: Option<usize>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub if_pos: usize,
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub for_pos: usize,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub for_pos: usize,
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    /// `:=` or `=`, absent for `for range x`
    pub tok: Option<Token>,
    pub x: Expr,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub switch_pos: usize,
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSwitchStmt {
    pub switch_pos: usize,
    pub init: Option<Box<Stmt>>,
    /// `x := y.(type)` or `y.(type)`
    pub assign: Box<Stmt>,
    pub body: BlockStmt,
}

/// A `case`/`default` clause of a switch; `list` is empty for `default`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub case_pos: usize,
    pub list: Vec<Expr>,
    pub colon: Option<usize>,
    pub body: Vec<Stmt>,
}

impl CaseClause {
    pub fn is_default(&self) -> bool {
        self.list.is_empty()
    }
}

/// A `case`/`default` clause of a select; `comm` is `None` for `default`
#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    pub case_pos: usize,
    pub comm: Option<Box<Stmt>>,
    pub colon: Option<usize>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Bad,
    Empty {
        implicit: bool,
    },
    Decl(GenDecl),
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Expr(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    IncDec {
        x: Expr,
        tok: Token,
    },
    Assign {
        lhs: Vec<Expr>,
        tok: Token,
        tok_pos: usize,
        rhs: Vec<Expr>,
    },
    Go(Expr),
    Defer(Expr),
    Return(Vec<Expr>),
    Branch {
        tok: Token,
        label: Option<Ident>,
    },
    Block(BlockStmt),
    If(IfStmt),
    CaseClause(CaseClause),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    CommClause(CommClause),
    Select(BlockStmt),
    For(ForStmt),
    Range(RangeStmt),
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn bad(span: Span) -> Self {
        Self::new(StmtKind::Bad, span)
    }

    /// Short node name used in diagnostics and tree dumps
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Bad => "BadStmt",
            StmtKind::Empty { .. } => "EmptyStmt",
            StmtKind::Decl(_) => "DeclStmt",
            StmtKind::Labeled { .. } => "LabeledStmt",
            StmtKind::Expr(_) => "ExprStmt",
            StmtKind::Send { .. } => "SendStmt",
            StmtKind::IncDec { .. } => "IncDecStmt",
            StmtKind::Assign { .. } => "AssignStmt",
            StmtKind::Go(_) => "GoStmt",
            StmtKind::Defer(_) => "DeferStmt",
            StmtKind::Return(_) => "ReturnStmt",
            StmtKind::Branch { .. } => "BranchStmt",
            StmtKind::Block(_) => "BlockStmt",
            StmtKind::If(_) => "IfStmt",
            StmtKind::CaseClause(_) => "CaseClause",
            StmtKind::Switch(_) => "SwitchStmt",
            StmtKind::TypeSwitch(_) => "TypeSwitchStmt",
            StmtKind::CommClause(_) => "CommClause",
            StmtKind::Select(_) => "SelectStmt",
            StmtKind::For(_) => "ForStmt",
            StmtKind::Range(_) => "RangeStmt",
        }
    }
}
