use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::index::{DocId, InvertedIndex, Posting};

/// A crawled page as stored on disk, one numbered file per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub depth: u32,
    pub html: String,
}

pub fn page_path(dir: &Path, id: DocId) -> PathBuf {
    dir.join(id.to_string())
}

/// Write `page` to `<dir>/<id>`: url, depth and HTML length each on their own
/// line, then exactly that many bytes of HTML with no trailing newline.
pub fn save_page(dir: &Path, id: DocId, page: &PageRecord) -> Result<()> {
    let path = page_path(dir, id);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write!(w, "{}\n{}\n{}\n", page.url, page.depth, page.html.len())?;
    w.write_all(page.html.as_bytes())?;
    w.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Load the numbered page file `<dir>/<id>`.
pub fn load_page(dir: &Path, id: DocId) -> Result<PageRecord> {
    let path = page_path(dir, id);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let mut r = BufReader::new(file);

    let url = read_field_line(&mut r, &path, "url")?;
    let depth = read_field_line(&mut r, &path, "depth")?
        .parse::<u32>()
        .with_context(|| format!("{}: bad depth", path.display()))?;
    let html_len = read_field_line(&mut r, &path, "html length")?
        .parse::<usize>()
        .with_context(|| format!("{}: bad html length", path.display()))?;

    let mut html = vec![0u8; html_len];
    r.read_exact(&mut html)
        .with_context(|| format!("{}: truncated html, expected {html_len} bytes", path.display()))?;
    let html = String::from_utf8(html)
        .with_context(|| format!("{}: html is not valid utf-8", path.display()))?;

    Ok(PageRecord { url, depth, html })
}

fn read_field_line(r: &mut impl BufRead, path: &Path, field: &str) -> Result<String> {
    let mut line = String::new();
    let n = r
        .read_line(&mut line)
        .with_context(|| format!("{}: reading {field}", path.display()))?;
    if n == 0 {
        bail!("{}: unexpected end of file reading {field}", path.display());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Write the index to `path`, one line per word:
/// `<word> <doc_id_1> <count_1> ... <doc_id_N> <count_N>`.
pub fn save_index(path: &Path, index: &InvertedIndex) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for (word, postings) in index.iter() {
        write!(w, "{word}")?;
        for p in postings {
            write!(w, " {} {}", p.doc_id, p.count)?;
        }
        writeln!(w)?;
    }
    w.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Load an index file written by [`save_index`].
pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut index = InvertedIndex::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };
        let mut postings = Vec::new();
        while let Some(id) = fields.next() {
            let Some(count) = fields.next() else {
                bail!("{}:{}: doc id without a count", path.display(), n + 1);
            };
            postings.push(Posting {
                doc_id: id
                    .parse::<DocId>()
                    .with_context(|| format!("{}:{}: bad doc id {id:?}", path.display(), n + 1))?,
                count: count
                    .parse::<u32>()
                    .with_context(|| format!("{}:{}: bad count {count:?}", path.display(), n + 1))?,
            });
        }
        index.insert_entry(word.to_string(), postings);
    }
    Ok(index)
}
