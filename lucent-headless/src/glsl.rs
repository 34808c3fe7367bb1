//! Just enough GLSL to produce driver-like diagnostics.
//!
//! Compilation checks that a stage is lexically sane (balanced delimiters, no stray characters)
//! and that it has a `void main()` entry point. Top-level declarations are parsed with their
//! qualifiers, declarator lists and array sizes, against the basic types of GLSL 3.30 core. The
//! stage interface is extracted from them: `in` / `out` variables and uniforms. Linking matches
//! fragment inputs against vertex outputs and merges uniforms.
//!
//! Declarations typed with a user-defined structure and interface blocks are accepted but left out
//! of the interface.
//!
//! Diagnostics follow the `0:line(column): error: message` shape most drivers use.

use std::collections::HashMap;
use std::fmt;

use lucent::shader::StageType;

/// Scalar component of a GLSL type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scalar {
  /// `bool`
  Bool,
  /// `int`
  Int,
  /// `uint`
  UInt,
  /// `float`
  Float,
}

impl Scalar {
  // prefix of vector and sampler type names
  fn prefix(self) -> &'static str {
    match self {
      Scalar::Bool => "b",
      Scalar::Int => "i",
      Scalar::UInt => "u",
      Scalar::Float => "",
    }
  }

  fn from_name(name: &str) -> Option<Self> {
    match name {
      "bool" => Some(Scalar::Bool),
      "int" => Some(Scalar::Int),
      "uint" => Some(Scalar::UInt),
      "float" => Some(Scalar::Float),
      _ => None,
    }
  }
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    let name = match *self {
      Scalar::Bool => "bool",
      Scalar::Int => "int",
      Scalar::UInt => "uint",
      Scalar::Float => "float",
    };

    f.write_str(name)
  }
}

const SAMPLER_DIMS: [&str; 10] = [
  "1D", "2D", "3D", "Cube", "2DRect", "1DArray", "2DArray", "Buffer", "2DMS", "2DMSArray",
];

// only float samplers have shadow variants
const SHADOW_SAMPLER_DIMS: [&str; 6] = [
  "1DShadow",
  "2DShadow",
  "CubeShadow",
  "2DRectShadow",
  "1DArrayShadow",
  "2DArrayShadow",
];

/// Basic types of GLSL 3.30 core.
///
/// User-defined structures are not part of this set.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GlslType {
  /// `bool`, `int`, `uint` or `float`.
  Scalar(Scalar),
  /// `bvecN`, `ivecN`, `uvecN` or `vecN`, with `N` in `2..=4`.
  Vector(Scalar, u8),
  /// `matN` or `matCxR`.
  Matrix {
    /// Number of columns.
    columns: u8,
    /// Number of rows.
    rows: u8,
  },
  /// `sampler*`, `isampler*` or `usampler*`.
  Sampler {
    /// Type of the sampled values.
    kind: Scalar,
    /// Dimensionality suffix, such as `2D` or `CubeShadow`.
    dim: &'static str,
  },
}

impl GlslType {
  /// Parse a type name.
  pub fn from_name(name: &str) -> Option<Self> {
    if let Some(scalar) = Scalar::from_name(name) {
      return Some(GlslType::Scalar(scalar));
    }

    for &kind in &[Scalar::Bool, Scalar::Int, Scalar::UInt, Scalar::Float] {
      let size = name
        .strip_prefix(kind.prefix())
        .and_then(|n| n.strip_prefix("vec"));

      if let Some(size) = size {
        return dimension(size).map(|size| GlslType::Vector(kind, size));
      }
    }

    if let Some(size) = name.strip_prefix("mat") {
      return match size.split_once('x') {
        Some((columns, rows)) => Some(GlslType::Matrix {
          columns: dimension(columns)?,
          rows: dimension(rows)?,
        }),

        None => dimension(size).map(|n| GlslType::Matrix {
          columns: n,
          rows: n,
        }),
      };
    }

    for &kind in &[Scalar::Int, Scalar::UInt, Scalar::Float] {
      let dim = name
        .strip_prefix(kind.prefix())
        .and_then(|n| n.strip_prefix("sampler"));

      if let Some(dim) = dim {
        let shadow_dims: &[&'static str] = if kind == Scalar::Float {
          &SHADOW_SAMPLER_DIMS
        } else {
          &[]
        };

        return SAMPLER_DIMS
          .iter()
          .chain(shadow_dims)
          .copied()
          .find(|&d| d == dim)
          .map(|dim| GlslType::Sampler { kind, dim });
      }
    }

    None
  }

  /// Whether the type holds signed or unsigned integers.
  pub fn is_integral(&self) -> bool {
    matches!(
      *self,
      GlslType::Scalar(Scalar::Int)
        | GlslType::Scalar(Scalar::UInt)
        | GlslType::Vector(Scalar::Int, _)
        | GlslType::Vector(Scalar::UInt, _)
    )
  }

  // types stage inputs and outputs can’t have
  fn is_opaque_or_bool(&self) -> bool {
    matches!(
      *self,
      GlslType::Sampler { .. } | GlslType::Scalar(Scalar::Bool) | GlslType::Vector(Scalar::Bool, _)
    )
  }
}

fn dimension(n: &str) -> Option<u8> {
  match n {
    "2" => Some(2),
    "3" => Some(3),
    "4" => Some(4),
    _ => None,
  }
}

impl fmt::Display for GlslType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlslType::Scalar(scalar) => fmt::Display::fmt(&scalar, f),
      GlslType::Vector(scalar, n) => write!(f, "{}vec{}", scalar.prefix(), n),
      GlslType::Matrix { columns, rows } if columns == rows => write!(f, "mat{}", columns),
      GlslType::Matrix { columns, rows } => write!(f, "mat{}x{}", columns, rows),
      GlslType::Sampler { kind, dim } => write!(f, "{}sampler{}", kind.prefix(), dim),
    }
  }
}

/// Interpolation qualifier of a stage input or output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Interpolation {
  /// `smooth`, also used when no qualifier is given.
  Smooth,
  /// `flat`
  Flat,
  /// `noperspective`
  NoPerspective,
}

impl Default for Interpolation {
  fn default() -> Self {
    Interpolation::Smooth
  }
}

impl fmt::Display for Interpolation {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      Interpolation::Smooth => f.write_str("smooth"),
      Interpolation::Flat => f.write_str("flat"),
      Interpolation::NoPerspective => f.write_str("noperspective"),
    }
  }
}

/// A named, typed interface variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
  /// Variable name.
  pub name: String,
  /// Type, or element type for arrays.
  pub ty: GlslType,
  /// Number of elements of an array.
  pub array_len: Option<u32>,
  /// Interpolation of stage inputs and outputs; always smooth for uniforms.
  pub interpolation: Interpolation,
}

impl Variable {
  /// Full type name, array size included.
  pub fn type_name(&self) -> String {
    match self.array_len {
      Some(len) => format!("{}[{}]", self.ty, len),
      None => self.ty.to_string(),
    }
  }

  fn same_type(&self, other: &Variable) -> bool {
    self.ty == other.ty && self.array_len == other.array_len
  }
}

/// What a compiled stage exposes to the linker.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StageInterface {
  /// `in` variables.
  pub inputs: Vec<Variable>,
  /// `out` variables.
  pub outputs: Vec<Variable>,
  /// Uniforms that are referenced outside of their declaration.
  pub active_uniforms: Vec<Variable>,
}

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
  Ident(String),
  Number(String),
  Punct(char),
}

#[derive(Clone, Debug)]
struct Token {
  kind: TokenKind,
  line: usize,
  col: usize,
}

impl Token {
  fn is_ident(&self, name: &str) -> bool {
    matches!(self.kind, TokenKind::Ident(ref s) if s == name)
  }

  fn is_punct(&self, c: char) -> bool {
    self.kind == TokenKind::Punct(c)
  }

  fn ident(&self) -> Option<&str> {
    match self.kind {
      TokenKind::Ident(ref s) => Some(s),
      _ => None,
    }
  }

  fn text(&self) -> String {
    match self.kind {
      TokenKind::Ident(ref s) | TokenKind::Number(ref s) => s.clone(),
      TokenKind::Punct(c) => c.to_string(),
    }
  }

  fn error(&self, msg: impl fmt::Display) -> String {
    error_at(self.line, self.col, msg)
  }

  fn unexpected(&self) -> String {
    self.error(format!("syntax error, unexpected `{}'", self.text()))
  }
}

fn error_at(line: usize, col: usize, msg: impl fmt::Display) -> String {
  format!("0:{}({}): error: {}", line, col, msg)
}

fn tokenize(src: &str) -> Result<Vec<Token>, String> {
  let mut tokens = Vec::new();

  for (line_nb, line) in strip_comments(src).lines().enumerate() {
    let line_nb = line_nb + 1;

    // preprocessor directives are left to the driver
    if line.trim_start().starts_with('#') {
      continue;
    }

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
      let c = chars[i];
      let col = i + 1;

      if c.is_whitespace() {
        i += 1;
      } else if c.is_ascii_alphabetic() || c == '_' {
        let start = i;

        while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
          i += 1;
        }

        tokens.push(Token {
          kind: TokenKind::Ident(chars[start..i].iter().collect()),
          line: line_nb,
          col,
        });
      } else if c.is_ascii_digit()
        || (c == '.' && chars.get(i + 1).map_or(false, char::is_ascii_digit))
      {
        let start = i;

        while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
          // signed exponent, as in 1.0e-3
          if (chars[i] == 'e' || chars[i] == 'E')
            && matches!(chars.get(i + 1), Some('+') | Some('-'))
          {
            i += 1;
          }

          i += 1;
        }

        tokens.push(Token {
          kind: TokenKind::Number(chars[start..i].iter().collect()),
          line: line_nb,
          col,
        });
      } else if "(){}[];,.=+-*/<>!&|?:%^~".contains(c) {
        tokens.push(Token {
          kind: TokenKind::Punct(c),
          line: line_nb,
          col,
        });
        i += 1;
      } else {
        return Err(error_at(
          line_nb,
          col,
          format!("syntax error, unexpected character `{}'", c),
        ));
      }
    }
  }

  Ok(tokens)
}

// Drop comments, keeping line breaks so that positions stay meaningful.
fn strip_comments(src: &str) -> String {
  let mut out = String::with_capacity(src.len());
  let mut chars = src.chars().peekable();

  while let Some(c) = chars.next() {
    let next = chars.peek().copied();

    match (c, next) {
      ('/', Some('/')) => {
        for c in chars.by_ref() {
          if c == '\n' {
            out.push('\n');
            break;
          }
        }
      }

      ('/', Some('*')) => {
        chars.next();
        let mut prev = ' ';

        for c in chars.by_ref() {
          if c == '\n' {
            out.push('\n');
          }

          if prev == '*' && c == '/' {
            break;
          }

          prev = c;
        }
      }

      _ => out.push(c),
    }
  }

  out
}

fn check_delimiters(tokens: &[Token]) -> Result<(), String> {
  let mut stack: Vec<&Token> = Vec::new();

  for token in tokens {
    let closing = match token.kind {
      TokenKind::Punct('(') | TokenKind::Punct('{') | TokenKind::Punct('[') => {
        stack.push(token);
        continue;
      }
      TokenKind::Punct(')') => '(',
      TokenKind::Punct('}') => '{',
      TokenKind::Punct(']') => '[',
      _ => continue,
    };

    match stack.pop() {
      Some(open) if open.is_punct(closing) => (),

      _ => {
        return Err(token.error("syntax error, unexpected closing delimiter"));
      }
    }
  }

  match stack.last() {
    Some(open) => Err(open.error("syntax error, unexpected end of file")),
    None => Ok(()),
  }
}

/// Storage qualifier of a top-level declaration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Storage {
  In,
  Out,
  Uniform,
  Const,
}

impl fmt::Display for Storage {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      Storage::In => f.write_str("in"),
      Storage::Out => f.write_str("out"),
      Storage::Uniform => f.write_str("uniform"),
      Storage::Const => f.write_str("const"),
    }
  }
}

/// Top-level declarations of a stage, as they are met.
#[derive(Debug)]
struct Scope<'a> {
  ty: StageType,
  structs: Vec<&'a str>,
  // integral constants usable as array sizes
  constants: HashMap<&'a str, u32>,
}

/// Compile a stage: validate it and extract its interface.
///
/// The error is a driver-like log and is never empty.
pub fn compile(ty: StageType, src: &str) -> Result<StageInterface, String> {
  let tokens = tokenize(src)?;

  if tokens.is_empty() {
    return Err(error_at(1, 1, format!("{} has no code", ty)));
  }

  check_delimiters(&tokens)?;

  let mut scope = Scope {
    ty,
    structs: Vec::new(),
    constants: HashMap::new(),
  };
  let mut interface = StageInterface::default();
  let mut uniforms = Vec::new();
  let mut has_main = false;
  let mut depth = 0usize;
  let mut statement_start = 0;

  for (i, token) in tokens.iter().enumerate() {
    match token.kind {
      TokenKind::Punct('{') | TokenKind::Punct('(') => {
        // struct definitions introduce type names
        if depth == 0 && token.is_punct('{') && i >= 2 && tokens[i - 2].is_ident("struct") {
          if let Some(name) = tokens[i - 1].ident() {
            scope.structs.push(name);
          }
        }

        depth += 1;
      }

      TokenKind::Punct('}') | TokenKind::Punct(')') => {
        depth -= 1;

        // end of a function, structure or block body
        if depth == 0 && token.is_punct('}') {
          statement_start = i + 1;
        }
      }

      TokenKind::Punct(';') if depth == 0 => {
        if let Some((storage, vars)) = declaration(&mut scope, &tokens[statement_start..i])? {
          match storage {
            Storage::In => interface.inputs.extend(vars),
            Storage::Out => interface.outputs.extend(vars),
            Storage::Uniform => uniforms.extend(vars),
            Storage::Const => (),
          }
        }

        statement_start = i + 1;
      }

      _ => (),
    }

    if depth == 0
      && token.is_ident("main")
      && i > 0
      && tokens[i - 1].is_ident("void")
      && tokens.get(i + 1).map_or(false, |t| t.is_punct('('))
    {
      has_main = true;
    }
  }

  if !has_main {
    return Err(error_at(1, 1, "entry point `main' not found"));
  }

  // a uniform is active if it’s referenced anywhere besides its own declaration
  interface.active_uniforms = uniforms
    .into_iter()
    .filter(|u| tokens.iter().filter(|t| t.is_ident(&u.name)).count() > 1)
    .collect();

  Ok(interface)
}

#[derive(Debug, Default)]
struct Qualifiers {
  storage: Option<Storage>,
  interpolation: Option<Interpolation>,
}

// Parse a top-level statement that is not a function definition.
//
// Interface declarations (`in`, `out` and `uniform`) yield their variables, one per declarator.
// Precision statements, function prototypes, structure-typed and interface block declarations
// yield nothing.
fn declaration<'a>(
  scope: &mut Scope<'a>,
  tokens: &'a [Token],
) -> Result<Option<(Storage, Vec<Variable>)>, String> {
  // empty statement, trailing `;` of a structure or `invariant` redeclaration
  if tokens.len() <= 2 && tokens.iter().all(|t| t.ident().is_some()) {
    return Ok(None);
  }

  if tokens[0].is_ident("precision") {
    return Ok(None);
  }

  let (qualifiers, rest) = parse_qualifiers(tokens)?;

  let ty_token = match rest.first() {
    Some(token) => token,
    // qualifier-only statement, such as a default layout
    None => return Ok(None),
  };

  let ty_name = ty_token.ident().ok_or_else(|| ty_token.unexpected())?;

  let ty = match GlslType::from_name(ty_name) {
    Some(ty) => ty,
    None if ty_name == "void" || scope.structs.contains(&ty_name) => return Ok(None),
    None => {
      return Err(ty_token.error(format!(
        "syntax error, unexpected `{}', expecting a type",
        ty_name
      )))
    }
  };

  let mut rest = &rest[1..];

  // function prototype
  if rest.get(1).map_or(false, |t| t.is_punct('(')) {
    return Ok(None);
  }

  let type_array_len = parse_array_len(scope, &mut rest)?;
  let mut vars = Vec::new();

  loop {
    let name_token = match rest.first() {
      Some(token) => token,
      None => {
        let last = &tokens[tokens.len() - 1];
        return Err(last.error("syntax error, unexpected `;', expecting an identifier"));
      }
    };
    let name = name_token.ident().ok_or_else(|| name_token.unexpected())?;
    rest = &rest[1..];

    let array_len = match (type_array_len, parse_array_len(scope, &mut rest)?) {
      (Some(_), Some(_)) => return Err(name_token.error("arrays of arrays are not allowed")),
      (a, b) => a.or(b),
    };

    let var = Variable {
      name: name.to_owned(),
      ty,
      array_len,
      interpolation: qualifiers.interpolation.unwrap_or_default(),
    };
    check_variable(scope.ty, &qualifiers, &var, name_token)?;

    if rest.first().map_or(false, |t| t.is_punct('=')) {
      let init = initializer(&rest[1..]);

      if let Some(storage @ Storage::In) | Some(storage @ Storage::Out) = qualifiers.storage {
        return Err(rest[0].error(format!(
          "cannot initialize `{}' variable `{}'",
          storage, name
        )));
      }

      if qualifiers.storage == Some(Storage::Const) && array_len.is_none() && ty.is_integral() {
        if let [Token {
          kind: TokenKind::Number(value),
          ..
        }] = init
        {
          if let Some(value) = integer_literal(value) {
            scope.constants.insert(name, value);
          }
        }
      }

      rest = &rest[1 + init.len()..];
    }

    vars.push(var);

    match rest.first() {
      None => break,
      Some(token) if token.is_punct(',') => rest = &rest[1..],
      Some(token) => return Err(token.unexpected()),
    }
  }

  Ok(qualifiers.storage.map(|storage| (storage, vars)))
}

// Split the leading qualifiers from a declaration.
fn parse_qualifiers(tokens: &[Token]) -> Result<(Qualifiers, &[Token]), String> {
  let mut qualifiers = Qualifiers::default();
  let mut rest = tokens;

  while let Some(token) = rest.first() {
    let storage = match token.ident() {
      Some("in") => Some(Storage::In),
      Some("out") => Some(Storage::Out),
      Some("uniform") => Some(Storage::Uniform),
      Some("const") => Some(Storage::Const),
      _ => None,
    };

    let interpolation = match token.ident() {
      Some("smooth") => Some(Interpolation::Smooth),
      Some("flat") => Some(Interpolation::Flat),
      Some("noperspective") => Some(Interpolation::NoPerspective),
      _ => None,
    };

    if let Some(storage) = storage {
      if qualifiers.storage.replace(storage).is_some() {
        return Err(token.error("multiple storage qualifiers in declaration"));
      }
    } else if let Some(interpolation) = interpolation {
      if qualifiers.interpolation.replace(interpolation).is_some() {
        return Err(token.error("multiple interpolation qualifiers in declaration"));
      }
    } else if token.is_ident("layout") {
      // layout qualifiers don’t nest parentheses
      match rest.iter().position(|t| t.is_punct(')')) {
        Some(end) if rest.get(1).map_or(false, |t| t.is_punct('(')) => {
          rest = &rest[end + 1..];
          continue;
        }
        _ => return Err(token.error("syntax error, expecting `(' after `layout'")),
      }
    } else if token.is_ident("attribute") || token.is_ident("varying") {
      return Err(token.error(format!(
        "`{}' qualifier is not allowed in GLSL 3.30 core",
        token.text()
      )));
    } else if !matches!(
      token.ident(),
      Some("centroid") | Some("invariant") | Some("highp") | Some("mediump") | Some("lowp")
    ) {
      break;
    }

    rest = &rest[1..];
  }

  Ok((qualifiers, rest))
}

// Parse an optional `[size]`, advancing past it.
fn parse_array_len(scope: &Scope, rest: &mut &[Token]) -> Result<Option<u32>, String> {
  let open = match rest.first() {
    Some(token) if token.is_punct('[') => token,
    _ => return Ok(None),
  };

  let len = match rest.get(1).map(|t| &t.kind) {
    Some(TokenKind::Number(value)) => integer_literal(value),
    Some(TokenKind::Ident(name)) => scope.constants.get(name.as_str()).copied(),
    _ => None,
  };

  match (len, rest.get(2)) {
    (Some(0), _) => Err(open.error("array size must be greater than zero")),

    (Some(len), Some(close)) if close.is_punct(']') => {
      *rest = &rest[3..];
      Ok(Some(len))
    }

    _ => Err(open.error("array size must be a constant integral expression")),
  }
}

fn integer_literal(value: &str) -> Option<u32> {
  let value = value.trim_end_matches(|c| c == 'u' || c == 'U');

  match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
    Some(hex) => u32::from_str_radix(hex, 16).ok(),
    None if value.len() > 1 && value.starts_with('0') => u32::from_str_radix(&value[1..], 8).ok(),
    None => value.parse().ok(),
  }
}

// Tokens of an initializer, up to the next declarator.
fn initializer(tokens: &[Token]) -> &[Token] {
  let mut depth = 0usize;

  for (i, token) in tokens.iter().enumerate() {
    match token.kind {
      TokenKind::Punct('(') | TokenKind::Punct('[') => depth += 1,
      TokenKind::Punct(')') | TokenKind::Punct(']') => depth = depth.saturating_sub(1),
      TokenKind::Punct(',') if depth == 0 => return &tokens[..i],
      _ => (),
    }
  }

  tokens
}

// Rules on qualifiers and types of stage inputs and outputs.
fn check_variable(
  stage: StageType,
  qualifiers: &Qualifiers,
  var: &Variable,
  token: &Token,
) -> Result<(), String> {
  let storage = match qualifiers.storage {
    Some(storage @ Storage::In) | Some(storage @ Storage::Out) => storage,

    _ if qualifiers.interpolation.is_some() => {
      return Err(token.error(format!(
        "interpolation qualifier on `{}', which is not a stage input or output",
        var.name
      )))
    }

    _ => return Ok(()),
  };

  if var.ty.is_opaque_or_bool() {
    return Err(token.error(format!(
      "{} {} `{}' cannot have type `{}'",
      stage, storage, var.name, var.ty
    )));
  }

  let interpolated = matches!(
    (stage, storage),
    (StageType::VertexShader, Storage::Out) | (StageType::FragmentShader, Storage::In)
  );

  if !interpolated && qualifiers.interpolation.is_some() {
    return Err(token.error(format!(
      "interpolation qualifier on {} {} `{}'",
      stage, storage, var.name
    )));
  }

  if stage == StageType::FragmentShader
    && storage == Storage::In
    && var.ty.is_integral()
    && var.interpolation != Interpolation::Flat
  {
    return Err(token.error(format!(
      "fragment shader input `{}' is an integer and must be qualified with `flat'",
      var.name
    )));
  }

  Ok(())
}

/// Link a vertex and a fragment interface, returning the active uniforms of the program.
///
/// Fragment inputs must match vertex outputs by name, type, array size and interpolation.
/// Uniforms used by both stages must have the same type.
///
/// The error is a driver-like log and is never empty.
pub fn link(vertex: &StageInterface, fragment: &StageInterface) -> Result<Vec<Variable>, String> {
  let mut errors = Vec::new();

  for input in &fragment.inputs {
    match vertex.outputs.iter().find(|o| o.name == input.name) {
      Some(output) if !output.same_type(input) => errors.push(format!(
        "error: `{}' declared as type `{}' in the vertex shader but as type `{}' in the fragment shader",
        input.name,
        output.type_name(),
        input.type_name()
      )),

      Some(output) if output.interpolation != input.interpolation => errors.push(format!(
        "error: vertex shader output `{}' specifies {} interpolation qualifier, but fragment shader input specifies {} interpolation qualifier",
        input.name, output.interpolation, input.interpolation
      )),

      Some(_) => (),

      None => errors.push(format!(
        "error: fragment shader input `{}' has no matching vertex shader output",
        input.name
      )),
    }
  }

  let mut uniforms: HashMap<&str, &Variable> = HashMap::new();
  let mut active = Vec::new();

  for uniform in vertex.active_uniforms.iter().chain(&fragment.active_uniforms) {
    match uniforms.get(uniform.name.as_str()) {
      Some(first) if !first.same_type(uniform) => errors.push(format!(
        "error: uniform `{}' declared as type `{}' and type `{}'",
        uniform.name,
        first.type_name(),
        uniform.type_name()
      )),

      Some(_) => (),

      None => {
        uniforms.insert(&uniform.name, uniform);
        active.push(uniform.clone());
      }
    }
  }

  if errors.is_empty() {
    Ok(active)
  } else {
    Err(errors.join("\n"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
out vec3 ourColor;
uniform float xOffset;
void main() {
  gl_Position = vec4(aPos.x + xOffset, aPos.y, aPos.z, 1.0);
  ourColor = aColor;
}
";

  const FS: &str = "#version 330 core
in vec3 ourColor;
out vec4 FragColor;
uniform float unused; // never referenced
void main() {
  FragColor = vec4(ourColor, 1.0);
}
";

  fn var(name: &str, ty: &str) -> Variable {
    Variable {
      name: name.to_owned(),
      ty: GlslType::from_name(ty).unwrap(),
      array_len: None,
      interpolation: Interpolation::Smooth,
    }
  }

  fn compile_fs(src: &str) -> Result<StageInterface, String> {
    compile(StageType::FragmentShader, src)
  }

  #[test]
  fn interface_extraction() {
    let vs = compile(StageType::VertexShader, VS).unwrap();

    assert_eq!(vs.inputs.len(), 2);
    assert_eq!(vs.outputs, vec![var("ourColor", "vec3")]);
    assert_eq!(vs.active_uniforms.len(), 1);
    assert_eq!(vs.active_uniforms[0].name, "xOffset");
  }

  #[test]
  fn unused_uniform_is_inactive() {
    let fs = compile_fs(FS).unwrap();
    assert!(fs.active_uniforms.is_empty());
  }

  #[test]
  fn type_names() {
    for name in &[
      "bool", "int", "uint", "float", "bvec2", "ivec3", "uvec4", "vec2", "mat2", "mat3", "mat4",
      "mat2x3", "mat4x2", "sampler1D", "sampler2D", "sampler3D", "samplerCube", "sampler2DRect",
      "sampler2DArray", "samplerBuffer", "sampler2DMS", "sampler2DShadow", "samplerCubeShadow",
      "isampler2D", "usampler3D", "isampler2DArray",
    ] {
      let ty = GlslType::from_name(name);
      assert_eq!(ty.map(|ty| ty.to_string()).as_deref(), Some(*name));
    }

    assert_eq!(GlslType::from_name("mat3x3"), GlslType::from_name("mat3"));

    for name in &["vec5", "mat1", "mat3x5", "isampler2DShadow", "bsampler2D", "vex3", "dvec2"] {
      assert_eq!(GlslType::from_name(name), None, "{}", name);
    }
  }

  #[test]
  fn matrix_and_integer_vector_uniforms() {
    let fs = compile_fs(
      "uniform mat3 m;
uniform ivec2 c;
out vec4 FragColor;
void main() { FragColor = vec4(m * vec3(c, 1.0), 1.0); }",
    )
    .unwrap();

    assert_eq!(fs.active_uniforms, vec![var("m", "mat3"), var("c", "ivec2")]);
  }

  #[test]
  fn declarator_lists() {
    let fs = compile_fs(
      "out vec4 a, b;
uniform float x = 1.0, y, z = max(1.0, 2.0);
void main() { a = vec4(x); b = vec4(y + z); }",
    )
    .unwrap();

    assert_eq!(fs.outputs, vec![var("a", "vec4"), var("b", "vec4")]);
    assert_eq!(
      fs.active_uniforms,
      vec![var("x", "float"), var("y", "float"), var("z", "float")]
    );
  }

  #[test]
  fn arrays() {
    let fs = compile_fs(
      "const int LIGHTS = 4;
uniform vec3 cols[2];
uniform float[3] weights;
uniform vec3 lights[LIGHTS];
out vec4 FragColor;
void main() { FragColor = vec4(cols[0] + cols[1] + lights[3] * weights[2], 1.0); }",
    )
    .unwrap();

    let lens: Vec<_> = fs
      .active_uniforms
      .iter()
      .map(|u| (u.name.as_str(), u.type_name()))
      .collect();
    assert_eq!(
      lens,
      vec![
        ("cols", "vec3[2]".to_owned()),
        ("weights", "float[3]".to_owned()),
        ("lights", "vec3[4]".to_owned())
      ]
    );
  }

  #[test]
  fn bad_array_sizes() {
    let log = compile_fs("uniform vec3 cols[0];\nvoid main() { cols; }").unwrap_err();
    assert!(log.contains("greater than zero"), "{}", log);

    let log = compile_fs("uniform vec3 cols[N];\nvoid main() { cols; }").unwrap_err();
    assert!(log.starts_with("0:1(18): error:"), "{}", log);

    let log = compile_fs("uniform float[2] w[3];\nvoid main() { w; }").unwrap_err();
    assert!(log.contains("arrays of arrays"), "{}", log);
  }

  #[test]
  fn qualified_inputs_are_part_of_the_interface() {
    let fs = compile_fs(
      "flat in int id;
noperspective centroid in vec2 uv;
layout (location = 0) out vec4 FragColor;
void main() { FragColor = vec4(uv, float(id), 1.0); }",
    )
    .unwrap();

    assert_eq!(fs.inputs.len(), 2);
    assert_eq!(fs.inputs[0].name, "id");
    assert_eq!(fs.inputs[0].interpolation, Interpolation::Flat);
    assert_eq!(fs.inputs[1].name, "uv");
    assert_eq!(fs.inputs[1].interpolation, Interpolation::NoPerspective);
  }

  #[test]
  fn integer_fragment_inputs_must_be_flat() {
    let log = compile_fs("in int id;\nout vec4 c;\nvoid main() { c = vec4(id); }").unwrap_err();
    assert!(log.contains("flat"), "{}", log);
  }

  #[test]
  fn misplaced_qualifiers() {
    let log = compile(StageType::VertexShader, "flat in vec3 aPos;\nvoid main() {}").unwrap_err();
    assert!(log.contains("interpolation qualifier"), "{}", log);

    let log = compile_fs("in sampler2D s;\nvoid main() {}").unwrap_err();
    assert!(log.contains("sampler2D"), "{}", log);

    let log = compile_fs("attribute vec3 p;\nvoid main() {}").unwrap_err();
    assert!(log.contains("attribute"), "{}", log);

    let log = compile_fs("in out vec3 p;\nvoid main() {}").unwrap_err();
    assert!(log.contains("storage"), "{}", log);
  }

  #[test]
  fn other_top_level_statements() {
    let fs = compile_fs(
      "precision mediump float;
struct Light { vec3 color; float power; };
uniform Light light;
uniform Material { vec3 albedo; } material;
invariant gl_Position;
vec3 shade(vec3 c);
out vec4 FragColor;
void main() { FragColor = vec4(shade(light.color), 1.0); }
vec3 shade(vec3 c) { return c * 0.5e-1; }",
    )
    .unwrap();

    assert_eq!(fs.outputs, vec![var("FragColor", "vec4")]);
    assert!(fs.active_uniforms.is_empty());
  }

  #[test]
  fn missing_brace() {
    let log = compile_fs("void main() { FragColor = vec4(1.0);").unwrap_err();
    assert!(log.starts_with("0:1(13): error:"), "{}", log);
  }

  #[test]
  fn missing_main() {
    let log = compile(StageType::VertexShader, "out vec3 color;").unwrap_err();
    assert!(log.contains("main"));
  }

  #[test]
  fn empty_source() {
    assert!(compile(StageType::VertexShader, "  // nothing\n").is_err());
  }

  #[test]
  fn unknown_type() {
    let log = compile(StageType::VertexShader, "out vex3 color;\nvoid main() {}").unwrap_err();
    assert!(log.contains("vex3"));
  }

  #[test]
  fn link_matches_varyings() {
    let vs = compile(StageType::VertexShader, VS).unwrap();
    let fs = compile_fs(FS).unwrap();
    let uniforms = link(&vs, &fs).unwrap();

    assert_eq!(uniforms.len(), 1);
    assert_eq!(uniforms[0].ty, GlslType::Scalar(Scalar::Float));
  }

  #[test]
  fn link_reports_missing_output() {
    let vs = compile(StageType::VertexShader, "void main() {}").unwrap();
    let fs = compile_fs(FS).unwrap();
    let log = link(&vs, &fs).unwrap_err();

    assert!(log.contains("ourColor"));
  }

  #[test]
  fn link_checks_flat_varyings() {
    let vs = compile(
      StageType::VertexShader,
      "flat out int id;\nout vec2 uv[2];\nvoid main() { id = 1; }",
    )
    .unwrap();

    let matching = compile_fs(
      "flat in int id;\nin vec2 uv[2];\nout vec4 c;\nvoid main() { c = vec4(uv[0], uv[1]); }",
    )
    .unwrap();
    assert!(link(&vs, &matching).is_ok());

    let smooth_uv = compile_fs("flat in int id;\nflat in vec2 uv[2];\nvoid main() {}").unwrap();
    let log = link(&vs, &smooth_uv).unwrap_err();
    assert!(log.contains("uv") && log.contains("flat"), "{}", log);

    let shorter = compile_fs("flat in int id;\nin vec2 uv[3];\nvoid main() {}").unwrap();
    let log = link(&vs, &shorter).unwrap_err();
    assert!(log.contains("vec2[2]") && log.contains("vec2[3]"), "{}", log);
  }

  #[test]
  fn link_checks_shared_uniforms() {
    let vs = compile(
      StageType::VertexShader,
      "uniform mat4 model;\nvoid main() { gl_Position = model * vec4(1.0); }",
    )
    .unwrap();
    let fs = compile_fs("uniform mat3 model;\nout vec4 c;\nvoid main() { c = vec4(model[0], 1.0); }")
      .unwrap();

    let log = link(&vs, &fs).unwrap_err();
    assert!(log.contains("mat4") && log.contains("mat3"), "{}", log);
  }
}
