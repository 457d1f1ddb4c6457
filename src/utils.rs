/// Lower-case `0x` prefixed hex of raw bytes.
pub fn lower_hex(bytes: &[u8]) -> String {
  format!("0x{}", hex::encode(bytes))
}

/// Parses `0x` + 32 bytes of hex, returning the canonical lower-case form.
pub fn normalize_tx_hash(input: &str) -> Option<String> {
  let trimmed = input.trim();
  let digits = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))?;
  match hex::decode(digits) {
    Ok(bytes) if bytes.len() == 32 => Some(lower_hex(&bytes)),
    _ => None,
  }
}

/// True for `0x` + 20 bytes of hex, in any case.
pub fn is_address(input: &str) -> bool {
  match input.strip_prefix("0x") {
    Some(digits) => matches!(hex::decode(digits), Ok(bytes) if bytes.len() == 20),
    None => false,
  }
}

/// Escapes LIKE wildcards so user text matches literally.
pub fn escape_like(input: &str) -> String {
  let mut escaped = String::with_capacity(input.len());
  for c in input.chars() {
    if c == '%' || c == '_' || c == '\\' {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}
