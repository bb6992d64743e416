// Copyright (C) 2024 The 9608 Pseudocode Project
// This file is part of the pc9608 library.

// The pc9608 library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The pc9608 library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the pc9608 library. If not, see <https://www.gnu.org/licenses/>.

use crate::file_table::{FileTable, HostIo};
use crate::frame::{find_place, Frame};
use crate::place::Place;
use crate::signal::Signal;
use crate::value::Value;
use indexmap::IndexMap;
use pc_ast::{
    BinaryOp, CallableDecl, CaseArm, Expr, ExprKind, FileMode, LiteralValue, ParamMode, Program, RecordDef, Stmt,
    StmtKind, Type, UnaryOp,
};
use pc_errors::{Error, Position, Result, RuntimeErrorKind};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Interpreter<'a> {
    global: Rc<RefCell<Frame>>,
    records: IndexMap<String, RecordDef>,
    callables: IndexMap<String, Rc<CallableDecl>>,
    pub(crate) files: FileTable,
    pub(crate) host: &'a mut dyn HostIo,
    call_stack: Vec<String>,
    pub(crate) rng_state: u64,
}

/// Runs a fully resolved program to completion against `host`.
#[tracing::instrument(skip_all)]
pub fn run(program: &Program, host: &mut dyn HostIo) -> Result<()> {
    let mut interp = Interpreter::new(host);
    let global = interp.global.clone();
    interp.exec_block(&global, &program.statements)?;
    Ok(())
}

impl<'a> Interpreter<'a> {
    fn new(host: &'a mut dyn HostIo) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E3779B97F4A7C15)
            | 1;
        Self {
            global: Frame::new_global(),
            records: IndexMap::new(),
            callables: IndexMap::new(),
            files: FileTable::default(),
            host,
            call_stack: Vec::new(),
            rng_state: seed,
        }
    }

    pub(crate) fn runtime_error(&self, position: Position, kind: RuntimeErrorKind) -> Error {
        let err = Error::runtime(position, kind);
        match self.call_stack.last() {
            Some(name) => err.with_callable(name.clone()),
            None => err,
        }
    }

    pub(crate) fn io_error(&self, position: Position, name: &str, e: std::io::Error) -> Error {
        self.runtime_error(position, RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: e.to_string() })
    }

    // -- Statement execution -------------------------------------------------

    pub(crate) fn exec_block(&mut self, frame: &Rc<RefCell<Frame>>, stmts: &[Stmt]) -> Result<Signal> {
        for stmt in stmts {
            let signal = self.exec_stmt(frame, stmt)?;
            if signal.is_return() {
                return Ok(signal);
            }
        }
        Ok(Signal::None)
    }

    fn exec_stmt(&mut self, frame: &Rc<RefCell<Frame>>, stmt: &Stmt) -> Result<Signal> {
        match &stmt.kind {
            StmtKind::Declare { name, ty } => {
                let value = Value::default_for(ty, &self.records);
                frame.borrow_mut().bind(name, Place::Var(Rc::new(RefCell::new(value))));
                Ok(Signal::None)
            }
            StmtKind::DeclareArray { name, dims, elem } => {
                let ty = Type::Array { elem: Box::new(elem.clone()), dims: dims.clone() };
                let value = Value::default_for(&ty, &self.records);
                frame.borrow_mut().bind(name, Place::Var(Rc::new(RefCell::new(value))));
                Ok(Signal::None)
            }
            StmtKind::TypeDecl { name, fields } => {
                self.records.insert(name.clone(), RecordDef { name: name.clone(), fields: fields.clone() });
                Ok(Signal::None)
            }
            StmtKind::Assign { target, value } => {
                let val = self.eval_expr(frame, value)?;
                let place = self.resolve_place(frame, target)?;
                place.set(self.coerce_assign(val, &target.ty()));
                Ok(Signal::None)
            }
            StmtKind::Output { values } => {
                for value in values {
                    let val = self.eval_expr(frame, value)?;
                    self.host.print(&val.to_string());
                }
                self.host.print("\n");
                Ok(Signal::None)
            }
            StmtKind::Input { target } => {
                let line = self
                    .host
                    .read_input_line()
                    .map_err(|e| self.io_error(stmt.position, "<stdin>", e))?;
                let place = self.resolve_place(frame, target)?;
                let value = self.coerce_input(&line, &target.ty(), stmt.position)?;
                place.set(value);
                Ok(Signal::None)
            }
            StmtKind::If { cond, then_block, else_block } => {
                if self.eval_bool(frame, cond)? {
                    self.exec_block(frame, then_block)
                } else {
                    self.exec_block(frame, else_block)
                }
            }
            StmtKind::Case { scrutinee, arms, otherwise } => self.exec_case(frame, scrutinee, arms, otherwise),
            StmtKind::While { cond, body } => {
                while self.eval_bool(frame, cond)? {
                    let signal = self.exec_block(frame, body)?;
                    if signal.is_return() {
                        return Ok(signal);
                    }
                }
                Ok(Signal::None)
            }
            StmtKind::Repeat { body, until } => loop {
                let signal = self.exec_block(frame, body)?;
                if signal.is_return() {
                    return Ok(signal);
                }
                if self.eval_bool(frame, until)? {
                    return Ok(Signal::None);
                }
            },
            StmtKind::For { var, start, stop, step, body } => self.exec_for(frame, stmt.position, var, start, stop, step, body),
            StmtKind::ProcedureDecl(decl) | StmtKind::FunctionDecl(decl) => {
                self.callables.insert(decl.name.clone(), decl.clone());
                Ok(Signal::None)
            }
            StmtKind::CallStmt { name, args } => {
                self.call_callable(frame, name, args, stmt.position)?;
                Ok(Signal::None)
            }
            StmtKind::Return { value } => {
                let val = self.eval_expr(frame, value)?;
                Ok(Signal::Return(val))
            }
            StmtKind::OpenFile { name, mode } => self.exec_open_file(stmt.position, name, *mode),
            StmtKind::ReadFile { name, target } => self.exec_read_file(frame, stmt.position, name, target),
            StmtKind::WriteFile { name, value } => self.exec_write_file(frame, stmt.position, name, value),
            StmtKind::CloseFile { name } => self.exec_close_file(stmt.position, name),
        }
    }

    fn exec_case(&mut self, frame: &Rc<RefCell<Frame>>, scrutinee: &Expr, arms: &[CaseArm], otherwise: &Option<Box<Stmt>>) -> Result<Signal> {
        let scrutinee_val = self.eval_expr(frame, scrutinee)?;
        for arm in arms {
            if values_equal(&scrutinee_val, &literal_to_value(&arm.value)) {
                return self.exec_stmt(frame, &arm.body);
            }
        }
        match otherwise {
            Some(stmt) => self.exec_stmt(frame, stmt),
            None => Ok(Signal::None),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn exec_for(
        &mut self,
        frame: &Rc<RefCell<Frame>>,
        position: Position,
        var: &str,
        start: &Expr,
        stop: &Expr,
        step: &Option<Expr>,
        body: &[Stmt],
    ) -> Result<Signal> {
        let place = find_place(frame, var)
            .ok_or_else(|| self.runtime_error(position, RuntimeErrorKind::FileModeMisuse { name: var.to_string(), reason: "is undeclared".into() }))?;
        let is_real = matches!(place.get(), Value::Real(_));
        let start_v = self.eval_expr(frame, start)?.as_real().expect("resolver guarantees a numeric FOR bound");
        let stop_v = self.eval_expr(frame, stop)?.as_real().expect("resolver guarantees a numeric FOR bound");
        let step_v = match step {
            Some(e) => self.eval_expr(frame, e)?.as_real().expect("resolver guarantees a numeric FOR step"),
            None => 1.0,
        };
        if step_v == 0.0 {
            return Err(self.runtime_error(position, RuntimeErrorKind::ZeroStep));
        }

        let mut current = start_v;
        loop {
            if step_v > 0.0 {
                if current > stop_v {
                    break;
                }
            } else if current < stop_v {
                break;
            }
            place.set(if is_real { Value::Real(current) } else { Value::Integer(current as i64) });
            let signal = self.exec_block(frame, body)?;
            if signal.is_return() {
                return Ok(signal);
            }
            current += step_v;
        }
        Ok(Signal::None)
    }

    fn exec_open_file(&mut self, position: Position, name: &str, mode: FileMode) -> Result<Signal> {
        if self.files.mode_of(name).is_some() {
            return Err(self.runtime_error(
                position,
                RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: "is already open".into() },
            ));
        }
        self.host.file_open(name, mode).map_err(|e| self.io_error(position, name, e))?;
        self.files.mark_open(name, mode);
        Ok(Signal::None)
    }

    fn exec_read_file(&mut self, frame: &Rc<RefCell<Frame>>, position: Position, name: &str, target: &Expr) -> Result<Signal> {
        match self.files.mode_of(name) {
            Some(FileMode::Read) => {}
            Some(_) => {
                return Err(self.runtime_error(
                    position,
                    RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: "is not open for reading".into() },
                ))
            }
            None => {
                return Err(self.runtime_error(
                    position,
                    RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: "is not open".into() },
                ))
            }
        }
        let line = self.host.file_read_line(name).map_err(|e| self.io_error(position, name, e))?;
        match line {
            Some(line) => {
                let place = self.resolve_place(frame, target)?;
                let value = self.coerce_input(&line, &target.ty(), position)?;
                place.set(value);
                Ok(Signal::None)
            }
            None => Err(self.runtime_error(position, RuntimeErrorKind::ReadPastEof(name.to_string()))),
        }
    }

    fn exec_write_file(&mut self, frame: &Rc<RefCell<Frame>>, position: Position, name: &str, value: &Expr) -> Result<Signal> {
        match self.files.mode_of(name) {
            Some(FileMode::Write) | Some(FileMode::Append) => {}
            Some(FileMode::Read) => {
                return Err(self.runtime_error(
                    position,
                    RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: "is not open for writing".into() },
                ))
            }
            None => {
                return Err(self.runtime_error(
                    position,
                    RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: "is not open".into() },
                ))
            }
        }
        let val = self.eval_expr(frame, value)?;
        self.host.file_write_line(name, &val.to_string()).map_err(|e| self.io_error(position, name, e))?;
        Ok(Signal::None)
    }

    fn exec_close_file(&mut self, position: Position, name: &str) -> Result<Signal> {
        if self.files.mode_of(name).is_none() {
            return Err(self.runtime_error(
                position,
                RuntimeErrorKind::FileModeMisuse { name: name.to_string(), reason: "is not open".into() },
            ));
        }
        self.host.file_close(name).map_err(|e| self.io_error(position, name, e))?;
        self.files.mark_closed(name);
        Ok(Signal::None)
    }

    // -- Expression evaluation ------------------------------------------------

    pub(crate) fn eval_expr(&mut self, frame: &Rc<RefCell<Frame>>, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_to_value(lit)),
            ExprKind::Name(name) => {
                let place = find_place(frame, name)
                    .unwrap_or_else(|| panic!("resolver guarantees '{name}' is declared before use"));
                Ok(place.get())
            }
            ExprKind::Unary(UnaryOp::Neg, operand) => match self.eval_expr(frame, operand)? {
                Value::Integer(i) => Ok(Value::Integer(-i)),
                Value::Real(r) => Ok(Value::Real(-r)),
                other => unreachable!("resolver guarantees a numeric operand, found {}", other.type_name()),
            },
            ExprKind::Unary(UnaryOp::Not, operand) => {
                let b = self.eval_bool(frame, operand)?;
                Ok(Value::Boolean(!b))
            }
            ExprKind::Binary(op, lhs, rhs) => self.eval_binary(frame, *op, lhs, rhs, expr.position),
            ExprKind::Index(..) | ExprKind::Field(..) => {
                let place = self.resolve_place(frame, expr)?;
                Ok(place.get())
            }
            ExprKind::Call(name, args) => Ok(self
                .call_callable(frame, name, args, expr.position)?
                .expect("resolver guarantees a FUNCTION call yields a value")),
        }
    }

    fn eval_bool(&mut self, frame: &Rc<RefCell<Frame>>, expr: &Expr) -> Result<bool> {
        match self.eval_expr(frame, expr)? {
            Value::Boolean(b) => Ok(b),
            other => unreachable!("resolver guarantees a BOOLEAN condition, found {}", other.type_name()),
        }
    }

    fn eval_binary(&mut self, frame: &Rc<RefCell<Frame>>, op: BinaryOp, lhs: &Expr, rhs: &Expr, position: Position) -> Result<Value> {
        if op == BinaryOp::And {
            return Ok(Value::Boolean(self.eval_bool(frame, lhs)? && self.eval_bool(frame, rhs)?));
        }
        if op == BinaryOp::Or {
            return Ok(Value::Boolean(self.eval_bool(frame, lhs)? || self.eval_bool(frame, rhs)?));
        }

        let lval = self.eval_expr(frame, lhs)?;
        let rval = self.eval_expr(frame, rhs)?;

        match op {
            BinaryOp::Eq => Ok(Value::Boolean(values_equal(&lval, &rval))),
            BinaryOp::NotEq => Ok(Value::Boolean(!values_equal(&lval, &rval))),
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
                let l = lval.as_real().expect("resolver guarantees numeric operands");
                let r = rval.as_real().expect("resolver guarantees numeric operands");
                let result = match op {
                    BinaryOp::Lt => l < r,
                    BinaryOp::Gt => l > r,
                    BinaryOp::LtEq => l <= r,
                    BinaryOp::GtEq => l >= r,
                    _ => unreachable!(),
                };
                Ok(Value::Boolean(result))
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                let both_integer = matches!((&lval, &rval), (Value::Integer(_), Value::Integer(_)));
                if op == BinaryOp::Div {
                    let l = lval.as_real().expect("resolver guarantees numeric operands");
                    let r = rval.as_real().expect("resolver guarantees numeric operands");
                    if r == 0.0 {
                        return Err(self.runtime_error(position, RuntimeErrorKind::DivisionByZero));
                    }
                    return Ok(Value::Real(l / r));
                }
                if both_integer {
                    let l = lval.as_integer().unwrap();
                    let r = rval.as_integer().unwrap();
                    let result = match op {
                        BinaryOp::Add => l + r,
                        BinaryOp::Sub => l - r,
                        BinaryOp::Mul => l * r,
                        _ => unreachable!(),
                    };
                    Ok(Value::Integer(result))
                } else {
                    let l = lval.as_real().expect("resolver guarantees numeric operands");
                    let r = rval.as_real().expect("resolver guarantees numeric operands");
                    let result = match op {
                        BinaryOp::Add => l + r,
                        BinaryOp::Sub => l - r,
                        BinaryOp::Mul => l * r,
                        _ => unreachable!(),
                    };
                    Ok(Value::Real(result))
                }
            }
            BinaryOp::And | BinaryOp::Or => unreachable!("handled by short-circuit branch above"),
        }
    }

    /// Resolves an expression that denotes a storage location (`Name`,
    /// `Index`, or `Field`) to a [`Place`], bounds-checking array subscripts
    /// along the way.
    pub(crate) fn resolve_place(&mut self, frame: &Rc<RefCell<Frame>>, expr: &Expr) -> Result<Place> {
        match &expr.kind {
            ExprKind::Name(name) => {
                Ok(find_place(frame, name).unwrap_or_else(|| panic!("resolver guarantees '{name}' is declared before use")))
            }
            ExprKind::Index(base, index_exprs) => {
                let base_place = self.resolve_place(frame, base)?;
                let array_rc = match base_place.get() {
                    Value::Array(rc) => rc,
                    other => unreachable!("resolver guarantees an ARRAY base, found {}", other.type_name()),
                };
                let mut indices = Vec::with_capacity(index_exprs.len());
                for index_expr in index_exprs {
                    let v = self.eval_expr(frame, index_expr)?;
                    indices.push(v.as_integer().expect("resolver guarantees INTEGER array indices"));
                }
                let flat = {
                    let data = array_rc.borrow();
                    data.flat_index(&indices)
                };
                match flat {
                    Some(idx) => Ok(Place::Index(array_rc, idx)),
                    None => {
                        let data = array_rc.borrow();
                        let (dim_idx, bound) = data
                            .dims
                            .iter()
                            .enumerate()
                            .find(|(i, b)| indices[*i] < b.lo || indices[*i] > b.hi)
                            .expect("flat_index failed, so some dimension is out of bounds");
                        Err(self.runtime_error(
                            expr.position,
                            RuntimeErrorKind::ArrayBounds { index: indices[dim_idx], lo: bound.lo, hi: bound.hi },
                        ))
                    }
                }
            }
            ExprKind::Field(base, field) => {
                let base_place = self.resolve_place(frame, base)?;
                match base_place.get() {
                    Value::Record(rc) => Ok(Place::Field(rc, field.clone())),
                    other => unreachable!("resolver guarantees a RECORD base, found {}", other.type_name()),
                }
            }
            other => unreachable!("resolver guarantees assignment/BYREF targets are Name, Index, or Field, found {other:?}"),
        }
    }

    /// Coerces a value being stored into a slot of declared type `target_ty`,
    /// applying the single INTEGER -> REAL widening rule and deep-copying
    /// `ARRAY`/`RECORD` values so assignment never aliases.
    fn coerce_assign(&self, value: Value, target_ty: &Type) -> Value {
        match (value, target_ty) {
            (Value::Integer(i), Type::Real) => Value::Real(i as f64),
            (v @ (Value::Array(_) | Value::Record(_)), _) => v.deep_clone(),
            (v, _) => v,
        }
    }

    fn coerce_input(&self, raw: &str, ty: &Type, position: Position) -> Result<Value> {
        let trimmed = raw.trim();
        let parsed = match ty {
            Type::Integer => trimmed.parse::<i64>().ok().map(Value::Integer),
            Type::Real => trimmed.parse::<f64>().ok().map(Value::Real),
            Type::String => Some(Value::Str(raw.to_string())),
            Type::Boolean => match trimmed.to_uppercase().as_str() {
                "TRUE" => Some(Value::Boolean(true)),
                "FALSE" => Some(Value::Boolean(false)),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| {
            self.runtime_error(
                position,
                RuntimeErrorKind::InputCoercionFailure { input: raw.to_string(), target_type: ty.to_string() },
            )
        })
    }

    // -- Calls -----------------------------------------------------------------

    pub(crate) fn call_callable(&mut self, frame: &Rc<RefCell<Frame>>, name: &str, args: &[Expr], position: Position) -> Result<Option<Value>> {
        if let Some(decl) = self.callables.get(name).cloned() {
            return self.call_user(frame, &decl, args, position).map(Some);
        }
        self.call_builtin(frame, name, args, position).map(Some)
    }

    fn call_user(&mut self, caller_frame: &Rc<RefCell<Frame>>, decl: &Rc<CallableDecl>, args: &[Expr], _position: Position) -> Result<Value> {
        let callee_frame = Frame::new_child(self.global.clone());
        for (param, arg) in decl.params.iter().zip(args) {
            let place = match param.mode {
                ParamMode::ByRef => self.resolve_place(caller_frame, arg)?,
                ParamMode::ByValue => {
                    let val = self.eval_expr(caller_frame, arg)?.deep_clone();
                    Place::Var(Rc::new(RefCell::new(val)))
                }
            };
            callee_frame.borrow_mut().bind(&param.name, place);
        }

        self.call_stack.push(decl.name.clone());
        let result = self.exec_block(&callee_frame, &decl.body);
        self.call_stack.pop();

        match result? {
            Signal::Return(v) => Ok(v),
            Signal::None => Ok(Value::Null),
        }
    }
}

fn literal_to_value(lit: &LiteralValue) -> Value {
    match lit {
        LiteralValue::Integer(i) => Value::Integer(*i),
        LiteralValue::Real(r) => Value::Real(*r),
        LiteralValue::Str(s) => Value::Str(s.clone()),
        LiteralValue::Boolean(b) => Value::Boolean(*b),
    }
}

/// Equality used by `=`/`<>` and by `CASE` arm matching: numeric values
/// compare across INTEGER/REAL, everything else compares same-variant.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(_) | Value::Real(_), Value::Integer(_) | Value::Real(_)) => {
            a.as_real().unwrap() == b.as_real().unwrap()
        }
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        _ => false,
    }
}
