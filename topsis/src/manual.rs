/*!

This is the long-form manual for `topsis` and `toprank`.

## The computation

For a decision matrix with `m` alternatives (rows) and `n` criteria (columns):

1. every column is divided by its Euclidean norm. A column made only of zeros
   stays at zero (the criterion is reported in `zeroColumns`);
2. every normalized column is multiplied by the weight of its criterion. The
   weights are used as given: nothing forces them to sum to 1;
3. the ideal point takes the best weighted value of each column (the largest
   for a `benefit` criterion, the smallest for a `cost` criterion), the
   anti-ideal point takes the worst one;
4. each alternative gets its Euclidean distance to both points;
5. the closeness is `D- / (D+ + D-)`. An alternative that sits on both points
   at once (a single alternative, or identical rows) gets a closeness of 0
   and is flagged as `degenerate`.

Alternatives are ranked by decreasing closeness. Ties keep the input order.

## Input formats

The following providers are supported:
* `csv` Comma Separated Values
* `xlsx` Excel workbooks
* `inline` the matrix is written directly in the configuration file

### `csv`

The first row holds the criterion names, each following row is one
alternative:

```text
Alternative,Harga,Kualitas,Nilai
Laptop A,8,6,7
Laptop B,7,9,8
Laptop C,9,7,6
```

The column holding the alternative names is set with `nameColumnIndex`
(default `1`) and the first column with scores with `firstValueColumnIndex`
(default `2`). Indexes start at 1 and can also be written as spreadsheet
letters (`"A"`, `"B"`, ...). `firstValueRowIndex` (default `2`) is the first
row holding scores; the row just above it holds the criterion names.

### `xlsx`

Same layout as `csv`, read from the worksheet named by `excelWorksheetName`
(the first worksheet by default).

### `inline`

```json
"dataSource": {
  "provider": "inline",
  "alternatives": ["Laptop A", "Laptop B", "Laptop C"],
  "matrix": [[8, 6, 7], [7, 9, 8], [9, 7, 6]]
}
```

## Configuration file

```json
{
  "outputSettings": { "problemName": "laptops", "decimalPlaces": 4 },
  "dataSource": { "provider": "csv", "filePath": "laptops.csv" },
  "criteria": [
    { "name": "Harga", "weight": 30, "type": "cost" },
    { "name": "Kualitas", "weight": 50, "type": "benefit" },
    { "name": "Nilai", "weight": 20, "type": "benefit" }
  ],
  "rules": { "weightScale": "percent", "requireWeightTotal": 100, "clampValues": [0, 100] }
}
```

The `rules` section is optional. By default the weights are fractions and
no total is enforced. `maxAlternatives` and `maxCriteria` bound the size
of the problem.

With an Excel file, the indexes are positions in the worksheet, even when
the table does not start at `A1`. Passing `--input` to a configuration with
the `inline` provider reads that file as CSV instead.

## Summary

The summary is a JSON document with a `config` section (problem name,
criteria and `rules`) and a `results` section. All the intermediate stages are reported (`normalizedMatrix`,
`weightedMatrix`, `idealPositive`, `idealNegative`, `separationFromIdeal`,
`separationFromNegativeIdeal`, `closeness`) together with the `ranking`.
Numbers are written as strings with `decimalPlaces` digits (4 by default).

 */
