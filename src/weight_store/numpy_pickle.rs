use crate::error::IoError;
use ndarray::{ArrayD, ArrayViewD, IxDyn, ShapeBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

mod opcode {
    pub const MARK: u8 = b'(';
    pub const STOP: u8 = b'.';
    pub const POP: u8 = b'0';
    pub const POP_MARK: u8 = b'1';
    pub const DUP: u8 = b'2';
    pub const BININT: u8 = b'J';
    pub const BININT1: u8 = b'K';
    pub const BININT2: u8 = b'M';
    pub const NONE: u8 = b'N';
    pub const REDUCE: u8 = b'R';
    pub const BINSTRING: u8 = b'T';
    pub const SHORT_BINSTRING: u8 = b'U';
    pub const BINUNICODE: u8 = b'X';
    pub const APPEND: u8 = b'a';
    pub const BUILD: u8 = b'b';
    pub const GLOBAL: u8 = b'c';
    pub const DICT: u8 = b'd';
    pub const EMPTY_DICT: u8 = b'}';
    pub const APPENDS: u8 = b'e';
    pub const BINGET: u8 = b'h';
    pub const LONG_BINGET: u8 = b'j';
    pub const LIST: u8 = b'l';
    pub const EMPTY_LIST: u8 = b']';
    pub const BINPUT: u8 = b'q';
    pub const LONG_BINPUT: u8 = b'r';
    pub const SETITEM: u8 = b's';
    pub const TUPLE: u8 = b't';
    pub const EMPTY_TUPLE: u8 = b')';
    pub const SETITEMS: u8 = b'u';
    pub const BINFLOAT: u8 = b'G';
    pub const BINBYTES: u8 = b'B';
    pub const SHORT_BINBYTES: u8 = b'C';
    pub const PROTO: u8 = 0x80;
    pub const NEWOBJ: u8 = 0x81;
    pub const TUPLE1: u8 = 0x85;
    pub const TUPLE2: u8 = 0x86;
    pub const TUPLE3: u8 = 0x87;
    pub const NEWTRUE: u8 = 0x88;
    pub const NEWFALSE: u8 = 0x89;
    pub const LONG1: u8 = 0x8a;
    pub const SHORT_BINUNICODE: u8 = 0x8c;
    pub const BINUNICODE8: u8 = 0x8d;
    pub const BINBYTES8: u8 = 0x8e;
    pub const STACK_GLOBAL: u8 = 0x93;
    pub const MEMOIZE: u8 = 0x94;
    pub const FRAME: u8 = 0x95;
    pub const BYTEARRAY8: u8 = 0x96;
}

/// Whether the pickle refers to numpy at all, in which case it has to go
/// through [`from_slice`] instead of the plain serde decoder.
pub(super) fn references_numpy(bytes: &[u8]) -> bool {
    bytes.windows(5).any(|window| window == b"numpy")
}

/// Decodes a pickled weight dictionary whose entries may be numpy arrays.
///
/// Every array is rebuilt from its shape, dtype and raw buffer and handed to
/// serde as nested lists, so `T` sees the same structure a pickle of plain
/// lists would give it.
///
/// Supported are float32 and float64 arrays in C or Fortran order, written
/// either through `_reconstruct` (protocols 2 to 4) or `_frombuffer` (protocol 5).
///
/// # Errors
///
/// - `IoError::NumpyPickleError` - The stream is malformed or holds objects other than float arrays
/// - `IoError::JsonError` - The decoded content does not have the structure of `T`
pub(super) fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, IoError> {
    let value = decode(bytes)?;
    serde_json::from_value(value).map_err(IoError::JsonError)
}

/// Runs the pickle and converts the resulting object tree into a JSON value
fn decode(bytes: &[u8]) -> Result<Value, IoError> {
    let (arena, root) = Machine::new(bytes).run()?;
    ObjectTree { arena }.to_json(root)
}

fn error(message: impl std::fmt::Display) -> IoError {
    IoError::NumpyPickleError(message.to_string())
}

/// One object produced by the pickle machine.
///
/// Containers hold indices into the arena, so an object filled in after it
/// was memoized is seen with its final content wherever it is referenced.
#[derive(Debug)]
enum Node {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<usize>),
    Tuple(Vec<usize>),
    Dict(Vec<(usize, usize)>),
    Global {
        module: String,
        name: String,
    },
    Object {
        callable: usize,
        args: usize,
        state: Option<usize>,
    },
}

struct Machine<'a> {
    data: &'a [u8],
    pos: usize,
    arena: Vec<Node>,
    stack: Vec<usize>,
    marks: Vec<usize>,
    memo: HashMap<u32, usize>,
}

impl<'a> Machine<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            arena: Vec::new(),
            stack: Vec::new(),
            marks: Vec::new(),
            memo: HashMap::new(),
        }
    }

    fn fail(&self, message: impl std::fmt::Display) -> IoError {
        error(format!("{} at byte {}", message, self.pos))
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], IoError> {
        let data = self.data;
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| self.fail("unexpected end of data"))?;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], IoError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    fn read_u8(&mut self) -> Result<u8, IoError> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_len4(&mut self) -> Result<usize, IoError> {
        Ok(u32::from_le_bytes(self.read_array()?) as usize)
    }

    fn read_len8(&mut self) -> Result<usize, IoError> {
        let len = u64::from_le_bytes(self.read_array()?);
        usize::try_from(len).map_err(|_| self.fail("length does not fit in memory"))
    }

    fn read_line(&mut self) -> Result<String, IoError> {
        let data = self.data;
        let rest = &data[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| self.fail("unterminated line"))?;
        let line = String::from_utf8(rest[..end].to_vec()).map_err(|e| self.fail(e))?;
        self.pos += end + 1;
        Ok(line)
    }

    fn read_utf8(&mut self, n: usize) -> Result<Node, IoError> {
        let bytes = self.read_bytes(n)?.to_vec();
        String::from_utf8(bytes)
            .map(Node::Str)
            .map_err(|e| self.fail(e))
    }

    /// Protocol 0-2 strings are raw bytes; they are read as latin-1 text
    fn read_latin1(&mut self, n: usize) -> Result<Node, IoError> {
        let bytes = self.read_bytes(n)?;
        Ok(Node::Str(bytes.iter().map(|&b| char::from(b)).collect()))
    }

    fn push(&mut self, node: Node) {
        self.arena.push(node);
        self.stack.push(self.arena.len() - 1);
    }

    fn pop(&mut self) -> Result<usize, IoError> {
        self.stack.pop().ok_or_else(|| self.fail("stack underflow"))
    }

    fn top(&self) -> Result<usize, IoError> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| self.fail("stack underflow"))
    }

    fn pop_mark(&mut self) -> Result<Vec<usize>, IoError> {
        let mark = self.marks.pop().ok_or_else(|| self.fail("missing mark"))?;
        if mark > self.stack.len() {
            return Err(self.fail("mark points past the stack"));
        }
        Ok(self.stack.split_off(mark))
    }

    fn pop_n(&mut self, n: usize) -> Result<Vec<usize>, IoError> {
        if self.stack.len() < n {
            return Err(self.fail("stack underflow"));
        }
        Ok(self.stack.split_off(self.stack.len() - n))
    }

    fn memo_get(&mut self, index: u32) -> Result<(), IoError> {
        let id = *self
            .memo
            .get(&index)
            .ok_or_else(|| self.fail(format!("missing memo entry {}", index)))?;
        self.stack.push(id);
        Ok(())
    }

    fn memo_put(&mut self, index: u32) -> Result<(), IoError> {
        let id = self.top()?;
        self.memo.insert(index, id);
        Ok(())
    }

    fn str_at(&self, id: usize) -> Result<&str, IoError> {
        match &self.arena[id] {
            Node::Str(s) => Ok(s),
            other => Err(self.fail(format!("expected a string, found {:?}", other))),
        }
    }

    fn list_mut(&mut self, id: usize) -> Result<&mut Vec<usize>, IoError> {
        let pos = self.pos;
        match &mut self.arena[id] {
            Node::List(items) => Ok(items),
            _ => Err(error(format!("append target is not a list at byte {}", pos))),
        }
    }

    fn dict_mut(&mut self, id: usize) -> Result<&mut Vec<(usize, usize)>, IoError> {
        let pos = self.pos;
        match &mut self.arena[id] {
            Node::Dict(pairs) => Ok(pairs),
            _ => Err(error(format!("setitem target is not a dict at byte {}", pos))),
        }
    }

    fn reduce(&mut self, callable: usize, args: usize) -> Result<(), IoError> {
        // Protocol 2 writes bytes as _codecs.encode(text, "latin1")
        if let Node::Global { module, name } = &self.arena[callable] {
            if module == "_codecs" && name == "encode" {
                let items = match &self.arena[args] {
                    Node::Tuple(items) => items.clone(),
                    _ => return Err(self.fail("_codecs.encode expects a tuple")),
                };
                let text = match items.first() {
                    Some(&id) => self.str_at(id)?,
                    None => "",
                };
                let bytes = text
                    .chars()
                    .map(|c| u8::try_from(c).map_err(|_| self.fail("text is not latin-1")))
                    .collect::<Result<Vec<u8>, IoError>>()?;
                self.push(Node::Bytes(bytes));
                return Ok(());
            }
        }

        self.push(Node::Object {
            callable,
            args,
            state: None,
        });
        Ok(())
    }

    fn run(mut self) -> Result<(Vec<Node>, usize), IoError> {
        use opcode::*;

        loop {
            match self.read_u8()? {
                PROTO => {
                    self.read_u8()?;
                }
                FRAME => {
                    self.read_bytes(8)?;
                }
                STOP => {
                    let root = self.pop()?;
                    return Ok((self.arena, root));
                }
                MARK => self.marks.push(self.stack.len()),
                POP => {
                    self.pop()?;
                }
                POP_MARK => {
                    self.pop_mark()?;
                }
                DUP => {
                    let top = self.top()?;
                    self.stack.push(top);
                }
                NONE => self.push(Node::None),
                NEWTRUE => self.push(Node::Bool(true)),
                NEWFALSE => self.push(Node::Bool(false)),
                BININT => {
                    let value = i32::from_le_bytes(self.read_array()?);
                    self.push(Node::Int(i64::from(value)));
                }
                BININT1 => {
                    let value = self.read_u8()?;
                    self.push(Node::Int(i64::from(value)));
                }
                BININT2 => {
                    let value = u16::from_le_bytes(self.read_array()?);
                    self.push(Node::Int(i64::from(value)));
                }
                LONG1 => {
                    let n = usize::from(self.read_u8()?);
                    let bytes = self.read_bytes(n)?;
                    let value = decode_long(bytes).ok_or_else(|| self.fail("integer too large"))?;
                    self.push(Node::Int(value));
                }
                BINFLOAT => {
                    let value = f64::from_be_bytes(self.read_array()?);
                    self.push(Node::Float(value));
                }
                SHORT_BINUNICODE => {
                    let n = usize::from(self.read_u8()?);
                    let node = self.read_utf8(n)?;
                    self.push(node);
                }
                BINUNICODE => {
                    let n = self.read_len4()?;
                    let node = self.read_utf8(n)?;
                    self.push(node);
                }
                BINUNICODE8 => {
                    let n = self.read_len8()?;
                    let node = self.read_utf8(n)?;
                    self.push(node);
                }
                SHORT_BINSTRING => {
                    let n = usize::from(self.read_u8()?);
                    let node = self.read_latin1(n)?;
                    self.push(node);
                }
                BINSTRING => {
                    let n = self.read_len4()?;
                    let node = self.read_latin1(n)?;
                    self.push(node);
                }
                SHORT_BINBYTES => {
                    let n = usize::from(self.read_u8()?);
                    let bytes = self.read_bytes(n)?.to_vec();
                    self.push(Node::Bytes(bytes));
                }
                BINBYTES => {
                    let n = self.read_len4()?;
                    let bytes = self.read_bytes(n)?.to_vec();
                    self.push(Node::Bytes(bytes));
                }
                BINBYTES8 | BYTEARRAY8 => {
                    let n = self.read_len8()?;
                    let bytes = self.read_bytes(n)?.to_vec();
                    self.push(Node::Bytes(bytes));
                }
                EMPTY_LIST => self.push(Node::List(Vec::new())),
                EMPTY_TUPLE => self.push(Node::Tuple(Vec::new())),
                EMPTY_DICT => self.push(Node::Dict(Vec::new())),
                LIST => {
                    let items = self.pop_mark()?;
                    self.push(Node::List(items));
                }
                TUPLE => {
                    let items = self.pop_mark()?;
                    self.push(Node::Tuple(items));
                }
                code @ (TUPLE1 | TUPLE2 | TUPLE3) => {
                    let n = usize::from(code - TUPLE1 + 1);
                    let items = self.pop_n(n)?;
                    self.push(Node::Tuple(items));
                }
                DICT => {
                    let items = self.pop_mark()?;
                    let pairs =
                        pair_up(&items).ok_or_else(|| self.fail("odd number of dict items"))?;
                    self.push(Node::Dict(pairs));
                }
                APPEND => {
                    let value = self.pop()?;
                    let list = self.top()?;
                    self.list_mut(list)?.push(value);
                }
                APPENDS => {
                    let values = self.pop_mark()?;
                    let list = self.top()?;
                    self.list_mut(list)?.extend(values);
                }
                SETITEM => {
                    let value = self.pop()?;
                    let key = self.pop()?;
                    let dict = self.top()?;
                    self.dict_mut(dict)?.push((key, value));
                }
                SETITEMS => {
                    let items = self.pop_mark()?;
                    let pairs =
                        pair_up(&items).ok_or_else(|| self.fail("odd number of dict items"))?;
                    let dict = self.top()?;
                    self.dict_mut(dict)?.extend(pairs);
                }
                BINPUT => {
                    let index = self.read_u8()?;
                    self.memo_put(u32::from(index))?;
                }
                LONG_BINPUT => {
                    let index = u32::from_le_bytes(self.read_array()?);
                    self.memo_put(index)?;
                }
                MEMOIZE => {
                    let index = u32::try_from(self.memo.len())
                        .map_err(|_| self.fail("memo overflow"))?;
                    self.memo_put(index)?;
                }
                BINGET => {
                    let index = self.read_u8()?;
                    self.memo_get(u32::from(index))?;
                }
                LONG_BINGET => {
                    let index = u32::from_le_bytes(self.read_array()?);
                    self.memo_get(index)?;
                }
                GLOBAL => {
                    let module = self.read_line()?;
                    let name = self.read_line()?;
                    self.push(Node::Global { module, name });
                }
                STACK_GLOBAL => {
                    let name = self.pop()?;
                    let module = self.pop()?;
                    let name = self.str_at(name)?.to_string();
                    let module = self.str_at(module)?.to_string();
                    self.push(Node::Global { module, name });
                }
                REDUCE => {
                    let args = self.pop()?;
                    let callable = self.pop()?;
                    self.reduce(callable, args)?;
                }
                NEWOBJ => {
                    let args = self.pop()?;
                    let callable = self.pop()?;
                    self.push(Node::Object {
                        callable,
                        args,
                        state: None,
                    });
                }
                BUILD => {
                    let new_state = self.pop()?;
                    let target = self.top()?;
                    let pos = self.pos;
                    match &mut self.arena[target] {
                        Node::Object { state, .. } => *state = Some(new_state),
                        _ => return Err(error(format!("BUILD on a plain value at byte {}", pos))),
                    }
                }
                other => return Err(self.fail(format!("unsupported opcode 0x{:02x}", other))),
            }
        }
    }
}

/// Little-endian two's complement, as written by LONG1
fn decode_long(bytes: &[u8]) -> Option<i64> {
    if bytes.len() > 8 {
        return None;
    }
    let fill = match bytes.last() {
        Some(&last) if last & 0x80 != 0 => 0xff,
        _ => 0x00,
    };
    let mut buf = [fill; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    Some(i64::from_le_bytes(buf))
}

fn pair_up(items: &[usize]) -> Option<Vec<(usize, usize)>> {
    if items.len() % 2 != 0 {
        return None;
    }
    Some(items.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Element type of a numpy array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloatType {
    F32 { big_endian: bool },
    F64 { big_endian: bool },
}

impl FloatType {
    fn width(self) -> usize {
        match self {
            FloatType::F32 { .. } => 4,
            FloatType::F64 { .. } => 8,
        }
    }

    fn read(self, chunk: &[u8]) -> f64 {
        match self {
            FloatType::F32 { big_endian } => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(chunk);
                let value = if big_endian {
                    f32::from_be_bytes(buf)
                } else {
                    f32::from_le_bytes(buf)
                };
                f64::from(value)
            }
            FloatType::F64 { big_endian } => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                if big_endian {
                    f64::from_be_bytes(buf)
                } else {
                    f64::from_le_bytes(buf)
                }
            }
        }
    }
}

struct ObjectTree {
    arena: Vec<Node>,
}

impl ObjectTree {
    fn to_json(&self, id: usize) -> Result<Value, IoError> {
        match &self.arena[id] {
            Node::None => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Int(i) => Ok(Value::from(*i)),
            Node::Float(x) => float_to_json(*x),
            Node::Str(s) => Ok(Value::String(s.clone())),
            Node::Bytes(_) => Err(error("raw bytes outside of an array")),
            Node::List(items) | Node::Tuple(items) => items
                .iter()
                .map(|&item| self.to_json(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Node::Dict(pairs) => {
                let mut map = Map::new();
                for &(key, value) in pairs {
                    let key = match &self.arena[key] {
                        Node::Str(s) => s.clone(),
                        other => {
                            return Err(error(format!(
                                "dictionary key {:?} is not a string",
                                other
                            )));
                        }
                    };
                    map.insert(key, self.to_json(value)?);
                }
                Ok(Value::Object(map))
            }
            Node::Global { module, name } => {
                Err(error(format!("bare reference to {}.{}", module, name)))
            }
            Node::Object {
                callable,
                args,
                state,
            } => {
                let array = self.ndarray(*callable, *args, *state)?;
                array_to_json(array.view())
            }
        }
    }

    fn global(&self, id: usize) -> Result<(&str, &str), IoError> {
        match &self.arena[id] {
            Node::Global { module, name } => Ok((module, name)),
            other => Err(error(format!("expected a class or function, found {:?}", other))),
        }
    }

    fn tuple(&self, id: usize) -> Result<&[usize], IoError> {
        match &self.arena[id] {
            Node::Tuple(items) => Ok(items),
            other => Err(error(format!("expected a tuple, found {:?}", other))),
        }
    }

    fn bytes(&self, id: usize) -> Result<Vec<u8>, IoError> {
        match &self.arena[id] {
            Node::Bytes(bytes) => Ok(bytes.clone()),
            // Python 2 pickles keep the buffer in a str
            Node::Str(text) => text
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| error("array buffer is not latin-1")))
                .collect(),
            other => Err(error(format!("expected an array buffer, found {:?}", other))),
        }
    }

    fn shape(&self, id: usize) -> Result<Vec<usize>, IoError> {
        self.tuple(id)?
            .iter()
            .map(|&dim| match self.arena[dim] {
                Node::Int(n) => {
                    usize::try_from(n).map_err(|_| error(format!("negative dimension {}", n)))
                }
                ref other => Err(error(format!("expected a dimension, found {:?}", other))),
            })
            .collect()
    }

    fn is_true(&self, id: usize) -> bool {
        matches!(self.arena[id], Node::Bool(true) | Node::Int(1))
    }

    /// Reads a `numpy.dtype(descr, align, copy)` object and its byte order
    fn dtype(&self, id: usize) -> Result<FloatType, IoError> {
        let (callable, args, state) = match self.arena[id] {
            Node::Object {
                callable,
                args,
                state,
            } => (callable, args, state),
            ref other => return Err(error(format!("expected a dtype, found {:?}", other))),
        };

        let (module, name) = self.global(callable)?;
        if !module.starts_with("numpy") || name != "dtype" {
            return Err(error(format!("expected numpy.dtype, found {}.{}", module, name)));
        }

        let descr = match self.tuple(args)?.first().map(|&d| &self.arena[d]) {
            Some(Node::Str(descr)) => descr.as_str(),
            _ => return Err(error("dtype without a type descriptor")),
        };

        // Byte order lives in the descriptor ("<f4") or in the second state field
        let (order, kind) = match descr.chars().next() {
            Some(c @ ('<' | '>' | '|' | '=')) => (Some(c), &descr[1..]),
            _ => {
                let order = state
                    .and_then(|s| self.tuple(s).ok())
                    .and_then(|fields| fields.get(1))
                    .and_then(|&f| match &self.arena[f] {
                        Node::Str(s) => s.chars().next(),
                        _ => None,
                    });
                (order, descr)
            }
        };
        let big_endian = order == Some('>');

        match kind {
            "f4" => Ok(FloatType::F32 { big_endian }),
            "f8" => Ok(FloatType::F64 { big_endian }),
            other => Err(error(format!("dtype '{}' is not float32 or float64", other))),
        }
    }

    fn ndarray(
        &self,
        callable: usize,
        args: usize,
        state: Option<usize>,
    ) -> Result<ArrayD<f64>, IoError> {
        let (module, name) = self.global(callable)?;
        if !module.starts_with("numpy") {
            return Err(error(format!("unsupported object {}.{}", module, name)));
        }

        match name {
            // _reconstruct(ndarray, (0,), b"b") followed by
            // BUILD (version, shape, dtype, fortran_order, data)
            "_reconstruct" => {
                let state = state.ok_or_else(|| error("ndarray without state"))?;
                let fields = self.tuple(state)?;
                let fields = if fields.len() == 5 { &fields[1..] } else { fields };
                let &[shape, dtype, fortran, data] = fields else {
                    return Err(error(format!("ndarray state has {} fields", fields.len())));
                };
                decode_elements(
                    self.shape(shape)?,
                    self.dtype(dtype)?,
                    self.is_true(fortran),
                    &self.bytes(data)?,
                )
            }
            // _frombuffer(buffer, dtype, shape, order)
            "_frombuffer" => {
                let &[data, dtype, shape, order] = self.tuple(args)? else {
                    return Err(error("_frombuffer expects four arguments"));
                };
                let fortran = matches!(&self.arena[order], Node::Str(order) if order == "F");
                decode_elements(
                    self.shape(shape)?,
                    self.dtype(dtype)?,
                    fortran,
                    &self.bytes(data)?,
                )
            }
            // scalar(dtype, data), a 0-d value such as np.float32(1.0)
            "scalar" => {
                let &[dtype, data] = self.tuple(args)? else {
                    return Err(error("scalar expects two arguments"));
                };
                decode_elements(Vec::new(), self.dtype(dtype)?, false, &self.bytes(data)?)
            }
            other => Err(error(format!("unsupported object {}.{}", module, other))),
        }
    }
}

fn decode_elements(
    shape: Vec<usize>,
    dtype: FloatType,
    fortran: bool,
    bytes: &[u8],
) -> Result<ArrayD<f64>, IoError> {
    let count: usize = shape.iter().product();
    if bytes.len() != count * dtype.width() {
        return Err(error(format!(
            "array of shape {:?} needs {} bytes, buffer has {}",
            shape,
            count * dtype.width(),
            bytes.len()
        )));
    }

    let values: Vec<f64> = bytes
        .chunks_exact(dtype.width())
        .map(|chunk| dtype.read(chunk))
        .collect();

    let shape = IxDyn(&shape);
    let array = if fortran {
        ArrayD::from_shape_vec(shape.f(), values)
    } else {
        ArrayD::from_shape_vec(shape, values)
    };
    array.map_err(error)
}

fn float_to_json(x: f64) -> Result<Value, IoError> {
    Number::from_f64(x)
        .map(Value::Number)
        .ok_or_else(|| error(format!("non-finite value {}", x)))
}

fn array_to_json(view: ArrayViewD<f64>) -> Result<Value, IoError> {
    if view.ndim() == 0 {
        let x = view.first().copied().ok_or_else(|| error("empty scalar"))?;
        return float_to_json(x);
    }
    view.outer_iter()
        .map(array_to_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
