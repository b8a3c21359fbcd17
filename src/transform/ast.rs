// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

//! Builders for the nodes the passes synthesize.

use crate::swc::ast::*;
use crate::swc::atoms::Atom;
use crate::swc::common::SyntaxContext;
use crate::swc::common::DUMMY_SP;

const SYNTHETIC_PREFIX: &str = "__$mod_";

/// Deterministic variable name for a specifier or keyword.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, so `"./a-b"`
/// maps to `__$mod___a_b`.
pub fn source_to_variable_name(source: &str) -> Atom {
  let mut name = String::with_capacity(SYNTHETIC_PREFIX.len() + source.len());
  name.push_str(SYNTHETIC_PREFIX);
  name.extend(source.chars().map(|c| {
    if c.is_ascii_alphanumeric() || c == '_' {
      c
    } else {
      '_'
    }
  }));
  name.into()
}

pub fn is_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
    _ => return false,
  }
  chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

pub fn ident(sym: impl Into<Atom>, ctxt: SyntaxContext) -> Ident {
  Ident::new(sym.into(), DUMMY_SP, ctxt)
}

pub fn str_lit(value: &str) -> Str {
  Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }
}

/// `require("<specifier>")`
pub fn require_call(specifier: &str, unresolved: SyntaxContext) -> Expr {
  Expr::Call(CallExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    callee: Callee::Expr(Box::new(Expr::Ident(ident("require", unresolved)))),
    args: vec![ExprOrSpread {
      spread: None,
      expr: Box::new(Expr::Lit(Lit::Str(str_lit(specifier)))),
    }],
    type_args: None,
  })
}

/// `<obj>.<prop>`, or `<obj>["<prop>"]` when the name isn't an identifier.
pub fn member_expr(obj: Expr, prop: &str) -> MemberExpr {
  let prop = if is_identifier_name(prop) {
    MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP))
  } else {
    MemberProp::Computed(ComputedPropName {
      span: DUMMY_SP,
      expr: Box::new(Expr::Lit(Lit::Str(str_lit(prop)))),
    })
  };
  MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(obj),
    prop,
  }
}

/// `var <name> = <init>;`
pub fn var_decl(name: Ident, init: Expr) -> Stmt {
  Stmt::Decl(Decl::Var(Box::new(VarDecl {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    kind: VarDeclKind::Var,
    declare: false,
    decls: vec![VarDeclarator {
      span: DUMMY_SP,
      name: name.into(),
      init: Some(Box::new(init)),
      definite: false,
    }],
  })))
}

pub fn expr_stmt(expr: Expr) -> Stmt {
  Stmt::Expr(ExprStmt {
    span: DUMMY_SP,
    expr: Box::new(expr),
  })
}

fn prop_name(name: &str) -> PropName {
  if is_identifier_name(name) {
    PropName::Ident(IdentName::new(name.into(), DUMMY_SP))
  } else {
    PropName::Str(str_lit(name))
  }
}

fn key_value(key: &str, value: Expr) -> PropOrSpread {
  PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
    key: prop_name(key),
    value: Box::new(value),
  })))
}

fn object_lit(props: Vec<PropOrSpread>) -> Expr {
  Expr::Object(ObjectLit {
    span: DUMMY_SP,
    props,
  })
}

fn call(callee: Expr, args: Vec<Expr>) -> Expr {
  Expr::Call(CallExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    callee: Callee::Expr(Box::new(callee)),
    args: args
      .into_iter()
      .map(|expr| ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
      })
      .collect(),
    type_args: None,
  })
}

/// `<exported>: { get: function () { return <local>; }, enumerable: true }`
///
/// The getter reads `local` on every access, which keeps the export a live
/// binding.
pub fn getter_property(local: Ident, exported: &str) -> PropOrSpread {
  let getter = Expr::Fn(FnExpr {
    ident: None,
    function: Box::new(Function {
      params: vec![],
      decorators: vec![],
      span: DUMMY_SP,
      ctxt: SyntaxContext::empty(),
      body: Some(BlockStmt {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        stmts: vec![Stmt::Return(ReturnStmt {
          span: DUMMY_SP,
          arg: Some(Box::new(Expr::Ident(local))),
        })],
      }),
      is_generator: false,
      is_async: false,
      type_params: None,
      return_type: None,
    }),
  });
  key_value(
    exported,
    object_lit(vec![
      key_value("get", getter),
      key_value(
        "enumerable",
        Expr::Lit(Lit::Bool(Bool {
          span: DUMMY_SP,
          value: true,
        })),
      ),
    ]),
  )
}

/// `Object.seal(Object.defineProperties(exports, { ... }));`
pub fn exports_object_stmt(
  properties: Vec<PropOrSpread>,
  unresolved: SyntaxContext,
) -> Stmt {
  let object_member = |name: &str| {
    Expr::Member(member_expr(Expr::Ident(ident("Object", unresolved)), name))
  };
  let define_properties = call(
    object_member("defineProperties"),
    vec![
      Expr::Ident(ident("exports", unresolved)),
      object_lit(properties),
    ],
  );
  expr_stmt(call(object_member("seal"), vec![define_properties]))
}
