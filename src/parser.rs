use crate::{Error, Network, Result};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till1},
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map_res, opt, rest},
    sequence::{delimited, preceded},
    IResult,
};
use std::path::Path;

/// Parse a single unsigned integer
fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// `*Vertices <n>`
fn header_line(input: &str) -> IResult<&str, usize> {
    all_consuming(preceded(tag("*Vertices"), preceded(space1, parse_usize)))(input)
}

/// A node name: a double-quoted string or a single whitespace-free token
fn node_name(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), is_not("\""), char('"')),
        take_till1(|c: char| c.is_whitespace()),
    ))(input)
}

/// Reject leftover input that is not separated by whitespace
fn end_of_fields(input: &str) -> IResult<&str, ()> {
    let (input, _) = opt(preceded(space1, rest))(input)?;
    if !input.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Space,
        )));
    }
    Ok((input, ()))
}

/// `<id>` or `<id> <name> ...`; fields after the name are ignored
fn vertex_line(input: &str) -> IResult<&str, (usize, Option<&str>)> {
    let (input, id) = parse_usize(input)?;
    let (input, name) = opt(preceded(space1, node_name))(input)?;
    let (input, _) = end_of_fields(input)?;
    Ok((input, (id, name)))
}

/// `*Edges` or `*Arcs`
fn section_line(input: &str) -> IResult<&str, &str> {
    preceded(alt((tag("*Edges"), tag("*Arcs"))), rest)(input)
}

/// `<src> <des>`; trailing fields such as a weight are ignored
fn edge_line(input: &str) -> IResult<&str, (usize, usize)> {
    let (input, src) = parse_usize(input)?;
    let (input, des) = preceded(space1, parse_usize)(input)?;
    let (input, _) = end_of_fields(input)?;
    Ok((input, (src, des)))
}

fn line_error(line_no: usize, what: &str, line: &str) -> Error {
    Error::format(format!("line {}: {}: {:?}", line_no, what, line))
}

/// Parse a network in `*Vertices` / `*Edges` text form.
///
/// Blank lines and surrounding whitespace are ignored. Exactly `n` vertex
/// lines must follow the header, line `i` carrying id `i`. An optional
/// `*Edges` or `*Arcs` line may follow them, and every remaining line is an
/// arc.
pub fn parse_network(input: &str) -> Result<Network> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .peekable();

    let (line_no, first) = lines
        .next()
        .ok_or_else(|| Error::format("empty network file"))?;
    let (_, n) = header_line(first)
        .map_err(|_| line_error(line_no, "expected `*Vertices <n>`", first))?;

    // Names grow with the lines actually present, so an inflated header
    // count fails on the mismatch instead of allocating up front.
    let mut names = Vec::new();
    while names.len() < n {
        let i = names.len() + 1;
        let (line_no, line) = match lines.next() {
            Some(entry) if !entry.1.starts_with('*') => entry,
            _ => {
                return Err(Error::format(format!(
                    "vertex count mismatch: header declares {} vertices, found {}",
                    n,
                    i - 1
                )))
            }
        };
        let (_, (id, name)) =
            vertex_line(line).map_err(|_| line_error(line_no, "malformed vertex line", line))?;
        if id != i {
            return Err(line_error(
                line_no,
                &format!("expected vertex {} in position {}", i, i),
                line,
            ));
        }
        names.push(name.map(str::to_string));
    }

    if let Some(&(_, line)) = lines.peek() {
        if section_line(line).is_ok() {
            lines.next();
        }
    }

    let mut edges = Vec::new();
    for (line_no, line) in lines {
        let (_, edge) =
            edge_line(line).map_err(|_| line_error(line_no, "malformed edge line", line))?;
        edges.push(edge);
    }

    Network::with_names(n, edges, names)
}

/// Read and parse a network file
pub fn parse_network_file(path: &Path) -> Result<Network> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_network(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;
    use rstest::rstest;

    #[test]
    fn parses_named_network() {
        let input = "*Vertices 3\n1\tTP53\n2 \"MDM 2\"\n3\n*Arcs\n1\t2\n2 3 0.5\n\n";
        let g = parse_network(input).unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.name(1), Some("TP53"));
        assert_eq!(g.name(2), Some("MDM 2"));
        assert_eq!(g.name(3), None);
        assert_eq!(g.edge(2), Some(Edge { src: 2, des: 3 }));
    }

    #[test]
    fn edges_without_section_line() {
        let g = parse_network("*Vertices 2\r\n1\r\n2\r\n2 1\r\n").unwrap();
        assert_eq!(g.edge(1), Some(Edge { src: 2, des: 1 }));
    }

    #[test]
    fn round_trips_through_writer() {
        let input = "*Vertices 3\n1\ta\n2\n3\tc\n*Edges\n1\t2\n3\t1\n1\t2\n";
        let g = parse_network(input).unwrap();
        assert_eq!(g.to_pajek(), input);
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_header("1\n2\n")]
    #[case::bad_count("*Vertices x\n")]
    #[case::too_few_vertices("*Vertices 3\n1\n2\n*Edges\n1 2\n")]
    #[case::vertex_out_of_range("*Vertices 2\n1\n5\n")]
    #[case::edge_out_of_range("*Vertices 2\n1\n2\n*Edges\n1 3\n")]
    #[case::zero_id("*Vertices 2\n1\n2\n*Edges\n0 1\n")]
    #[case::non_numeric_edge("*Vertices 2\n1\n2\n*Edges\n1 b\n")]
    #[case::single_token_edge("*Vertices 2\n1\n2\n*Edges\n1\n")]
    #[case::huge_vertex_count("*Vertices 18446744073709551615\n1\n")]
    #[case::inflated_vertex_count("*Vertices 1000000000\n1\n")]
    #[case::duplicate_vertex_id("*Vertices 2\n1 A\n1 B\n")]
    #[case::reordered_vertices("*Vertices 2\n2 B\n1 A\n")]
    #[case::glued_vertex_id("*Vertices 2\n1x\n2\n")]
    #[case::glued_edge_field("*Vertices 2\n1\n2\n*Edges\n1 2x\n")]
    fn rejects(#[case] input: &str) {
        assert!(matches!(parse_network(input), Err(Error::Format(_))));
    }

    #[test]
    fn spaced_names_round_trip() {
        let input = "*Vertices 2\n1 \"MDM 2\"\n2\tTP53\n*Edges\n1 2\n";
        let g = parse_network(input).unwrap();
        let reloaded = parse_network(&g.to_pajek()).unwrap();
        assert_eq!(reloaded.name(1), Some("MDM 2"));
        assert_eq!(reloaded, g);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_network_file(Path::new("/nonexistent/network.net")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
