//! JavaScript support code prepended to every generated module.
//!
//! The preludes patch built-ins so that absent values surface as `null`
//! instead of `undefined`/`-1` and so that calls which would silently coerce
//! throw instead. The helpers back operators whose GPJ semantics differ from
//! JavaScript's and are only emitted when the program uses them.

/// `String.compare`, `at`/`indexOf` returning `null`, `split` requiring a
/// separator.
pub const STRING_PRELUDE: &str = r##"String.compare = function (a, b) {
  if (a < b) return -1;
  if (a > b) return 1;
  return 0;
};
{
  const define = (name, value) =>
    Object.defineProperty(String.prototype, name, { value, writable: true, configurable: true });
  const stringAt = String.prototype.at;
  const stringIndexOf = String.prototype.indexOf;
  const stringSplit = String.prototype.split;
  define("at", function (index) {
    const result = stringAt.call(this, index);
    return result === undefined ? null : result;
  });
  define("indexOf", function (search, from) {
    const result = stringIndexOf.call(this, search, from);
    return result === -1 ? null : result;
  });
  define("split", function (separator, limit) {
    if (separator === undefined) {
      throw new TypeError("split() requires a separator");
    }
    return stringSplit.call(this, separator, limit);
  });
}"##;

/// `JSON.decycle` replaces repeated references with `{$ref: path}` objects,
/// paths being rooted at `$`. `JSON.recycle` restores them in place.
pub const JSON_PRELUDE: &str = r##"JSON.decycle = function (object) {
  const paths = new Map();
  return (function derez(value, path) {
    if (typeof value !== "object" || value === null) return value;
    const seen = paths.get(value);
    if (seen !== undefined) return { $ref: seen };
    paths.set(value, path);
    if (Array.isArray(value)) {
      return value.map((element, i) => derez(element, path + "[" + i + "]"));
    }
    const copy = {};
    for (const key of Object.keys(value)) {
      copy[key] = derez(value[key], path + "[" + JSON.stringify(key) + "]");
    }
    return copy;
  })(object, "$");
};
JSON.recycle = function ($) {
  const step = /\[(?:(\d+)|("(?:[^"\\]|\\.)*"))\]/g;
  const follow = (path) => {
    let target = $;
    let match;
    step.lastIndex = 0;
    while ((match = step.exec(path)) !== null) {
      target = target[match[1] !== undefined ? Number(match[1]) : JSON.parse(match[2])];
    }
    return target;
  };
  (function rez(value) {
    if (typeof value !== "object" || value === null) return;
    for (const key of Object.keys(value)) {
      const item = value[key];
      if (typeof item !== "object" || item === null) continue;
      if (typeof item.$ref === "string" && item.$ref.startsWith("$")) {
        value[key] = follow(item.$ref);
      } else {
        rez(item);
      }
    }
  })($);
  return $;
};"##;

/// Deep structural equality over own enumerable keys. `seen` holds the pairs
/// already under comparison so cyclic values terminate.
pub const EQ_SRC: &str = r##"function __gpj_eq(a, b, seen = []) {
  if (a === b) return true;
  if (typeof a !== "object" || typeof b !== "object" || a === null || b === null) return false;
  if (Array.isArray(a) !== Array.isArray(b)) return false;
  for (const [x, y] of seen) {
    if (x === a && y === b) return true;
  }
  seen.push([a, b]);
  const keys = Object.keys(a);
  if (keys.length !== Object.keys(b).length) return false;
  for (const key of keys) {
    if (!Object.prototype.hasOwnProperty.call(b, key)) return false;
    if (!__gpj_eq(a[key], b[key], seen)) return false;
  }
  return true;
}"##;

/// Array methods returning `null` for "not found", `indexOf` comparing with
/// `__gpj_eq`, and `sort` requiring a comparator.
pub const ARRAY_PRELUDE: &str = r##"{
  const define = (name, value) =>
    Object.defineProperty(Array.prototype, name, { value, writable: true, configurable: true });
  const arrayPop = Array.prototype.pop;
  const arrayShift = Array.prototype.shift;
  const arraySort = Array.prototype.sort;
  define("pop", function () {
    return this.length === 0 ? null : arrayPop.call(this);
  });
  define("shift", function () {
    return this.length === 0 ? null : arrayShift.call(this);
  });
  define("find", function (predicate) {
    for (let i = 0; i < this.length; i++) {
      if (predicate(this[i], i, this)) return this[i];
    }
    return null;
  });
  define("findIndex", function (predicate) {
    for (let i = 0; i < this.length; i++) {
      if (predicate(this[i], i, this)) return i;
    }
    return null;
  });
  define("indexOf", function (value) {
    for (let i = 0; i < this.length; i++) {
      if (__gpj_eq(this[i], value)) return i;
    }
    return null;
  });
  define("sort", function (compare) {
    if (typeof compare !== "function") {
      throw new TypeError("sort() requires a comparator function");
    }
    return arraySort.call(this, compare);
  });
}"##;

pub const ADD_SRC: &str = r##"function __gpj_add(a, b) {
  if (typeof a === "number" && typeof b === "number") return a + b;
  if (typeof a === "string" && typeof b === "string") return a + b;
  throw new TypeError("Cannot use + on " + typeof a + " and " + typeof b);
}"##;

pub const ARITH_SRC: &str = r##"function __gpj_arith(op, a, b) {
  if (typeof a !== "number" || typeof b !== "number") {
    throw new TypeError("Cannot use " + op + " on " + typeof a + " and " + typeof b);
  }
  switch (op) {
    case "-": return a - b;
    case "*": return a * b;
    case "/": return a / b;
    case "%": return a % b;
    case "**": return a ** b;
  }
}"##;

pub const TYPEOF_SRC: &str = r##"function __gpj_typeof(value) {
  if (value === null || value === undefined) return "None";
  if (Array.isArray(value)) return "Array";
  switch (typeof value) {
    case "number": return "Number";
    case "string": return "String";
    case "boolean": return "Boolean";
    case "function": return "Function";
    default: return "Object";
  }
}"##;

pub const IS_STRUCT_SRC: &str = r##"function __gpj_isStruct(value, shape) {
  if (typeof value !== "object" || value === null) return false;
  for (const key of Object.keys(shape)) {
    if (!(key in value) || __gpj_typeof(value[key]) !== shape[key]) return false;
  }
  return true;
}"##;

/// Optional helpers. The derived order is the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Helper {
    Add,
    Arith,
    Typeof,
    IsStruct,
}

impl Helper {
    pub fn name(&self) -> &'static str {
        match self {
            Helper::Add => "__gpj_add",
            Helper::Arith => "__gpj_arith",
            Helper::Typeof => "__gpj_typeof",
            Helper::IsStruct => "__gpj_isStruct",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Helper::Add => ADD_SRC,
            Helper::Arith => ARITH_SRC,
            Helper::Typeof => TYPEOF_SRC,
            Helper::IsStruct => IS_STRUCT_SRC,
        }
    }

    /// Helpers this one calls at runtime.
    pub fn requires(&self) -> &'static [Helper] {
        match self {
            Helper::IsStruct => &[Helper::Typeof],
            _ => &[],
        }
    }
}

/// The preludes every module starts with, in order.
pub fn always_emitted() -> [&'static str; 4] {
    [STRING_PRELUDE, JSON_PRELUDE, EQ_SRC, ARRAY_PRELUDE]
}
