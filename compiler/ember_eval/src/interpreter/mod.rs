//! Tree-walking interpreter.
//!
//! The interpreter itself holds no program state beyond the current call
//! depth; all bindings live in the namespaces passed to `exec_unit` and in the
//! function objects it creates.

mod frame;

use std::cell::Cell;
use std::rc::Rc;

use ember_ir::{ClassDef, CodeUnit, Expr, ExprKind, FnDef, Name, Stmt};
use rustc_hash::FxHashMap;

use crate::operators::{evaluate_binary, evaluate_unary};
use crate::{
    ensure_sufficient_stack, lookup_attr, set_attr, Bindings, BoundMethod, Class, EvalError,
    EvalResult, Function, FunctionCode, FunctionState, Instance, Namespace, Value,
};
use frame::Frame;

/// Default limit on nested calls before `EvalError::RecursionLimit`.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Name of the method run on a fresh instance when its class is called.
const INIT_METHOD: &str = "init";

/// Statement outcome.
enum Flow {
    Next,
    Return(Value),
}

pub struct Interpreter {
    depth: Cell<usize>,
    max_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            depth: Cell::new(0),
            max_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Execute every top-level statement of `unit` with `globals` as the
    /// module namespace.
    ///
    /// Bindings made before a failing statement stay in `globals`; callers
    /// that need all-or-nothing semantics execute into a scratch namespace.
    #[tracing::instrument(level = "debug", skip_all, fields(origin = %unit.origin, module = %module))]
    pub fn exec_unit(
        &self,
        unit: &CodeUnit,
        globals: &Namespace,
        module: &Name,
    ) -> Result<(), EvalError> {
        let mut frame = Frame::module(globals, module);
        for stmt in &unit.body {
            if let Flow::Return(_) = self.exec_stmt(stmt, &mut frame)? {
                return Err(EvalError::ReturnOutsideFunction);
            }
        }
        Ok(())
    }

    /// Call any callable value with positional arguments.
    pub fn call(&self, callee: &Value, mut args: Vec<Value>) -> EvalResult {
        match callee {
            Value::Builtin(builtin) => (builtin.func)(&args),
            Value::Function(func) => self.call_function(func, args),
            Value::Method(method) => {
                args.insert(0, method.receiver().clone());
                self.call_function(method.func(), args)
            }
            Value::Class(class) => self.instantiate(class, args),
            other => Err(EvalError::NotCallable {
                type_name: other.type_name(),
            }),
        }
    }

    /// Attribute access that fails with `NoAttribute` instead of `None`.
    pub fn get_attr(&self, value: &Value, name: &str) -> EvalResult {
        lookup_attr(value, name).ok_or_else(|| EvalError::no_attribute(value, name))
    }

    fn instantiate(&self, class: &Class, args: Vec<Value>) -> EvalResult {
        let instance = Value::Instance(Instance::new(class.clone()));
        match class.lookup(INIT_METHOD) {
            Some(Value::Function(init)) => {
                let bound = Value::Method(BoundMethod::new(instance.clone(), init));
                self.call(&bound, args)?;
            }
            Some(other) => {
                self.call(&other, args)?;
            }
            None if !args.is_empty() => {
                return Err(EvalError::arity(class.name(), 0, 0, args.len()));
            }
            None => {}
        }
        Ok(instance)
    }

    fn call_function(&self, func: &Function, args: Vec<Value>) -> EvalResult {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Err(EvalError::RecursionLimit {
                depth: self.max_depth,
            });
        }

        // Snapshot: a reload while this frame runs must not change it.
        let code = func.code();
        let defaults = func.defaults();
        let locals = bind_arguments(func.name(), &code, defaults, args)?;

        self.depth.set(depth + 1);
        let _guard = DepthGuard(&self.depth);
        tracing::trace!(function = %func.name(), depth, "call");

        let mut frame = Frame::function(func.globals(), func.module(), locals);
        for stmt in &code.body {
            if let Flow::Return(value) = self.exec_stmt(stmt, &mut frame)? {
                return Ok(value);
            }
        }
        Ok(Value::None)
    }

    // ===== Statements =====

    fn exec_block(&self, body: &[Stmt], frame: &mut Frame<'_>) -> Result<Flow, EvalError> {
        for stmt in body {
            if let flow @ Flow::Return(_) = self.exec_stmt(stmt, frame)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Next)
    }

    fn exec_stmt(&self, stmt: &Stmt, frame: &mut Frame<'_>) -> Result<Flow, EvalError> {
        match stmt {
            Stmt::Let { name, value, .. } => {
                let value = self.eval(value, frame)?;
                frame.bind(name.clone(), value);
            }
            Stmt::Assign { target, value, .. } => {
                let value = self.eval(value, frame)?;
                match &target.kind {
                    ExprKind::Attr { object, attr } => {
                        let object = self.eval(object, frame)?;
                        set_attr(&object, attr.clone(), value)?;
                    }
                    ExprKind::Ident(name) => frame.bind(name.clone(), value),
                    // The parser only produces the two targets above.
                    _ => {}
                }
            }
            Stmt::Fn(def) => {
                let func = self.define_function(def, frame)?;
                frame.bind(def.name.clone(), Value::Function(func));
            }
            Stmt::Class(def) => {
                let class = self.define_class(def, frame)?;
                frame.bind(def.name.clone(), Value::Class(class));
            }
            Stmt::Return { value, .. } => {
                if !frame.is_function() {
                    return Err(EvalError::ReturnOutsideFunction);
                }
                let value = match value {
                    Some(expr) => self.eval(expr, frame)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Raise { value, .. } => {
                let value = self.eval(value, frame)?;
                return Err(EvalError::Raised {
                    message: value.to_string(),
                });
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
                ..
            } => {
                let branch = if self.eval(cond, frame)?.is_truthy() {
                    then_body
                } else {
                    else_body
                };
                return self.exec_block(branch, frame);
            }
            Stmt::Expr(expr) => {
                self.eval(expr, frame)?;
            }
        }
        Ok(Flow::Next)
    }

    fn define_function(&self, def: &FnDef, frame: &mut Frame<'_>) -> Result<Function, EvalError> {
        let mut defaults = Vec::with_capacity(def.default_count());
        for param in &def.params {
            if let Some(default) = &param.default {
                defaults.push(self.eval(default, frame)?);
            }
        }
        let state = FunctionState {
            doc: def.doc.clone(),
            attrs: Bindings::default(),
            code: Rc::new(FunctionCode::from_def(def)),
            defaults,
        };
        Ok(Function::new(
            def.name.clone(),
            frame.module.clone(),
            frame.globals.clone(),
            state,
        ))
    }

    fn define_class(&self, def: &ClassDef, frame: &mut Frame<'_>) -> Result<Class, EvalError> {
        let mut bases = Vec::with_capacity(def.bases.len());
        for base in &def.bases {
            match self.eval(base, frame)? {
                Value::Class(class) => bases.push(class),
                other => {
                    return Err(EvalError::InvalidBase {
                        class: def.name.to_string(),
                        found: other.type_name(),
                    })
                }
            }
        }

        let mut attrs = Bindings::default();
        attrs.insert(Name::new("__module__"), Value::string(frame.module));
        attrs.insert(
            Name::new("__doc__"),
            def.doc.as_deref().map_or(Value::None, Value::string),
        );

        let mut body = Frame::class_body(frame.globals, frame.module, attrs);
        for stmt in &def.body {
            if let Flow::Return(_) = self.exec_stmt(stmt, &mut body)? {
                return Err(EvalError::ReturnOutsideFunction);
            }
        }
        Ok(Class::new(def.name.clone(), bases, body.into_class_attrs()))
    }

    // ===== Expressions =====

    fn eval(&self, expr: &Expr, frame: &mut Frame<'_>) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr, frame))
    }

    fn eval_inner(&self, expr: &Expr, frame: &mut Frame<'_>) -> EvalResult {
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Str(s) => Ok(Value::string(s)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Ident(name) => frame
                .lookup(name)
                .ok_or_else(|| EvalError::undefined_variable(name)),
            ExprKind::Attr { object, attr } => {
                let object = self.eval(object, frame)?;
                self.get_attr(&object, attr)
            }
            ExprKind::Call { callee, args } => {
                let callee = self.eval(callee, frame)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, frame)?);
                }
                self.call(&callee, values)
            }
            ExprKind::Binary {
                op: ember_ir::BinaryOp::And,
                left,
                right,
            } => {
                let left = self.eval(left, frame)?;
                if left.is_truthy() {
                    self.eval(right, frame)
                } else {
                    Ok(left)
                }
            }
            ExprKind::Binary {
                op: ember_ir::BinaryOp::Or,
                left,
                right,
            } => {
                let left = self.eval(left, frame)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval(right, frame)
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left, frame)?;
                let right = self.eval(right, frame)?;
                evaluate_binary(*op, &left, &right)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand, frame)?;
                evaluate_unary(*op, &operand)
            }
        }
    }
}

/// Decrements the call depth when a call frame is left, on every path.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

fn bind_arguments(
    name: &Name,
    code: &FunctionCode,
    defaults: Vec<Value>,
    args: Vec<Value>,
) -> Result<FxHashMap<Name, Value>, EvalError> {
    let max = code.params.len();
    let min = max.saturating_sub(defaults.len());
    if args.len() < min || args.len() > max {
        return Err(EvalError::arity(name, min, max, args.len()));
    }

    let supplied = args.len();
    let mut locals = FxHashMap::default();
    let mut args = args.into_iter();
    let mut defaults = defaults.into_iter().skip(supplied.saturating_sub(min));
    for param in &code.params {
        let value = args.next().or_else(|| defaults.next()).unwrap_or(Value::None);
        locals.insert(param.clone(), value);
    }
    Ok(locals)
}
