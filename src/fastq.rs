//src/fastq.rs

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ahash::AHashSet;
use flate2::read::MultiGzDecoder;

use crate::error::Error;
use crate::types::{ReadRecord, ReadTable};

/// Opens a FASTQ file for a streaming pass; `.gz` inputs are wrapped in a
/// MultiGzDecoder based on the file extension.
fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let f = File::open(path).map_err(|e| Error::input_io(path, e))?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    if is_gz {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
    } else {
        Ok(Box::new(BufReader::new(f)))
    }
}

/// Streams a FASTQ file once and builds the read table: one `(id, length)`
/// row per record, in file order. Sequence and quality payloads are measured
/// and dropped; only one line is buffered at a time.
///
/// The id is the header token before the first space, without the leading
/// `@`. Malformed record boundaries are an error, not a skip.
pub fn index_fastq<P: AsRef<Path>>(path: P) -> Result<ReadTable, Error> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let mut table = ReadTable::new();
    let mut line = String::new();
    let mut record_no: u64 = 0;

    loop {
        line.clear();
        // 1) header
        if reader
            .read_line(&mut line)
            .map_err(|e| Error::input_io(path, e))?
            == 0
        {
            break; // EOF between records is the only clean exit
        }
        record_no += 1;
        let header_line = line.trim_end();
        if !header_line.starts_with('@') {
            return Err(Error::malformed(
                path,
                format!("record {record_no}: header does not start with '@'"),
            ));
        }
        let id = header_line[1..]
            .split(' ')
            .next()
            .unwrap_or("")
            .to_string();

        // 2) sequence
        line.clear();
        if reader
            .read_line(&mut line)
            .map_err(|e| Error::input_io(path, e))?
            == 0
        {
            return Err(Error::malformed(
                path,
                format!("record {record_no}: truncated before sequence line"),
            ));
        }
        let len = line.trim_end().len() as u64;

        // 3) separator
        line.clear();
        if reader
            .read_line(&mut line)
            .map_err(|e| Error::input_io(path, e))?
            == 0
        {
            return Err(Error::malformed(
                path,
                format!("record {record_no}: truncated before '+' line"),
            ));
        }
        if !line.starts_with('+') {
            return Err(Error::malformed(
                path,
                format!("record {record_no}: separator line does not start with '+'"),
            ));
        }

        // 4) quality
        line.clear();
        if reader
            .read_line(&mut line)
            .map_err(|e| Error::input_io(path, e))?
            == 0
        {
            return Err(Error::malformed(
                path,
                format!("record {record_no}: truncated before quality line"),
            ));
        }

        table.push(ReadRecord { id, len });
    }

    Ok(table)
}

/// Second pass over the input: writes every record whose id is in
/// `selected_ids` to `output`, preserving the original header, sequence and
/// quality lines. Returns the number of records written.
///
/// Records sharing an id with a selected row all pass the filter; the set
/// cannot tell them apart.
pub fn write_selected_reads<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    selected_ids: &AHashSet<String>,
) -> Result<u64, Error> {
    let input = input.as_ref();
    let mut reader = open_reader(input)?;

    let out_file =
        File::create(output.as_ref()).map_err(|e| Error::input_io(output.as_ref(), e))?;
    let mut writer = BufWriter::new(out_file);

    let mut written: u64 = 0;
    let mut header = String::new();
    let mut seq = String::new();
    let mut plus = String::new();
    let mut qual = String::new();

    loop {
        header.clear();
        if reader
            .read_line(&mut header)
            .map_err(|e| Error::input_io(input, e))?
            == 0
        {
            break;
        }
        seq.clear();
        plus.clear();
        qual.clear();
        for buf in [&mut seq, &mut plus, &mut qual] {
            if reader
                .read_line(buf)
                .map_err(|e| Error::input_io(input, e))?
                == 0
            {
                return Err(Error::malformed(input, "truncated record in second pass"));
            }
        }

        let header_line = header.trim_end();
        let id = header_line
            .strip_prefix('@')
            .unwrap_or(header_line)
            .split(' ')
            .next()
            .unwrap_or("");

        if selected_ids.contains(id) {
            write!(
                writer,
                "{}\n{}\n+\n{}\n",
                header_line,
                seq.trim_end(),
                qual.trim_end()
            )
            .map_err(|e| Error::input_io(input, e))?;
            written += 1;
        }
    }

    writer.flush().map_err(|e| Error::input_io(input, e))?;
    Ok(written)
}
