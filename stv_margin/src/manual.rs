/*!

This is the long-form manual for `stv_margin` and `stvmargin`.

## Input format

The command line tool reads ballot files in the PrefLib style (`.toi`, `.soc`):

```text
# FILE NAME: example.toi
# NUMBER ALTERNATIVES: 3
10: 1,2,3
7: 2,3,1
5: 3,2,1
2:
```

Each ballot line is `<number of voters>:<comma-separated ranking>`.
- Lines that start with `#` or that do not contain `:` are ignored.
- In each ranking entry, all the characters that are not digits are removed. Ties written
  as `{1,2}` are therefore read as the plain ranking `1,2`.
- An empty ranking is accepted: these voters never count for any candidate.
- A number of voters that is not a number stops the program with the line number.

## Elimination rule

All the candidates `1..=n` start active. At each round, every ballot counts for its
most preferred active candidate, and all the candidates with the lowest count are
eliminated together. The last round eliminates the winners: there may be more than one
of them if they end up tied. When a single winner is needed, the smallest identifier
of the winners is used.

## Minimum adjustment

For a losing candidate, the elimination is replayed while protecting the candidate:
whenever it would be eliminated, the candidates at the next higher score are eliminated
instead, and the round records how many votes it was missing to reach that score
plus one (its "savior size"). The adjustment of the candidate is its largest savior size.
It is a lower bound of the help needed, not a guarantee.

Candidates listed in `excludedCandidates` are never analyzed (for example "none of the
above" or "write-in" options).

## Coalition search

Candidates are tried from the smallest adjustment to the largest. For a candidate `a`
and the current winner `w`:
1. The possible coalition members are the voters that rank `a` before `w`, or that rank
   neither of them. They are ordered so that the voters who rank `a` the lowest come first.
2. Starting from `adjustment + ceilingSlack` (and never above the best size found so far),
   the first `k` possible voters are moved to a ballot that only contains `a`, and the
   election is run again.
3. While the winner changes, `k` decreases. When it does not change anymore, `k` moves up
   again as long as it stays below the best size found so far, and the search stops
   otherwise.

The result is the smallest `k` that changed the winner, with the ballots of these
voters. When no coalition works, the size is `sizeSentinel` (1000 by default).

## Configuration

The program accepts a configuration file in JSON:

```json
{
  "outputSettings": { "contestName": "example", "outputDirectory": "output" },
  "ballotFile": { "provider": "toi", "filePath": "example.toi" },
  "rules": {
    "numCandidates": 11,
    "excludedCandidates": [10, 11],
    "shuffleSeed": 3,
    "ceilingSlack": 100,
    "sizeSentinel": 1000
  }
}
```

All the fields of `rules` are optional. Without `numCandidates`, the largest candidate
found in the ballots is used. With `shuffleSeed`, the ballots are put in a pseudo-random
order first; this changes which voters the coalition search picks when several are
equally good. The file path is relative to the configuration file. The command line
options take precedence over the configuration file.

 */
