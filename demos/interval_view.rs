use std::env;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

use biocoord::Options;
use biocoord::Reader;
use biocoord::Record;
use flate2::read::MultiGzDecoder;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let src = env::args().nth(1).expect("missing src");

    let file = File::open(&src)?;
    let inner: Box<dyn BufRead> = if src.ends_with(".gz") {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut reader = Reader::open(&src, None, inner, Options::default())?;

    let mut builder = Builder::default();
    builder.push_record(["Format", "Name", "Contig", "Strand", "Start", "End", "Length"]);

    for result in reader.records() {
        let record = result?;
        let interval = record.interval();

        let name = match &record {
            Record::Gff3(record) => record
                .attributes()
                .first("ID")
                .unwrap_or(record.feature_type())
                .to_string(),
            Record::Psl(record) => record.query().name().to_string(),
            Record::Fasta(record) => record.description().to_string(),
        };

        builder.push_record([
            record.format().to_string(),
            name,
            interval.reference().to_string(),
            interval.strand().to_string(),
            interval.start().to_string(),
            interval.end().to_string(),
            interval.len().to_string(),
        ]);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}", table);

    Ok(())
}
