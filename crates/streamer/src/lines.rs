use std::io::{self, BufRead};

/// Decodes UTF-8, silently dropping every invalid byte sequence.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Iterates the text lines of a reader.
///
/// `\n`, `\r\n` and a lone `\r` all end a line and are yielded as `\n`. A final
/// line without a terminator is yielded unchanged. Undecodable bytes are
/// dropped rather than reported, so a damaged file never stops the caller.
pub struct LineReader<R> {
    inner: R,
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            skip_lf: false,
        }
    }

    fn next_raw(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }

            // A `\r` ended the previous buffer; swallow the `\n` of a split `\r\n`.
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    self.inner.consume(1);
                    continue;
                }
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    line.extend_from_slice(&available[..i]);
                    line.push(b'\n');
                    let mut used = i + 1;
                    if available[i] == b'\r' {
                        match available.get(i + 1) {
                            Some(b'\n') => used += 1,
                            Some(_) => {}
                            None => self.skip_lf = true,
                        }
                    }
                    self.inner.consume(used);
                    return Ok(Some(line));
                }
                None => {
                    let n = available.len();
                    line.extend_from_slice(available);
                    self.inner.consume(n);
                }
            }
        }

        Ok(if line.is_empty() { None } else { Some(line) })
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_raw() {
                Ok(Some(raw)) => {
                    // Only an unterminated tail of invalid bytes decodes to nothing.
                    let line = decode_dropping_invalid(&raw);
                    if !line.is_empty() {
                        return Some(Ok(line));
                    }
                }
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn collect(bytes: &[u8]) -> Vec<String> {
        LineReader::new(Cursor::new(bytes.to_vec()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn keeps_terminators_and_unterminated_tail() {
        assert_eq!(collect(b"id,a\nid,b\nid,c"), vec!["id,a\n", "id,b\n", "id,c"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn blank_lines_are_lines() {
        assert_eq!(collect(b"\n\n"), vec!["\n", "\n"]);
    }

    #[test]
    fn universal_newlines_translate_to_lf() {
        assert_eq!(collect(b"a,1\r\nb,2\rc,3\n"), vec!["a,1\n", "b,2\n", "c,3\n"]);
    }

    #[test]
    fn crlf_split_across_buffers() {
        // Capacity 4 forces the `\r` and `\n` into separate fills.
        let reader = BufReader::with_capacity(4, Cursor::new(b"a,b\r\nc,d\r\n".to_vec()));
        let lines: Vec<String> = LineReader::new(reader).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a,b\n", "c,d\n"]);
    }

    #[test]
    fn invalid_bytes_are_dropped() {
        assert_eq!(collect(b"id,tw\xffeet\n\xc3\xa9,ok\n"), vec!["id,tweet\n", "é,ok\n"]);
        assert_eq!(decode_dropping_invalid(b"abc\xe2\x82"), "abc");
    }

    #[test]
    fn undecodable_tail_is_not_a_line() {
        assert_eq!(collect(b"1,a\n\xff"), vec!["1,a\n"]);
        assert!(collect(b"\xff").is_empty());
        assert_eq!(collect(b"\xff\n"), vec!["\n"]);
    }

    #[test]
    fn replacement_character_in_input_survives() {
        assert_eq!(decode_dropping_invalid("x\u{fffd}y".as_bytes()), "x\u{fffd}y");
    }
}
