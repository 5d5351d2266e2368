//! End-to-end: ingest changesets into shards, then run a distributed apply
//! over them.

use arrow::array::Int64Array;

use bitframe::{
    ApplyExecutor, ApplyRequest, CancelToken, ChangesetRequest, ColumnSpec, ColumnType,
    ColumnValues, CombineOp, DataFrame, DataframeStore, Evaluator, MapReduceEngine, Program,
    Result, RowResolver, TableSchema, Value,
};

/// Interprets exactly one program, `first column`: gather the first column's
/// filtered rows into a vector partial.
struct GatherEvaluator;

impl Evaluator for GatherEvaluator {
    fn evaluate(
        &self,
        _program: &Program,
        table: &DataFrame,
        rows: &dyn RowResolver,
    ) -> Result<Value> {
        let mut values = Vec::with_capacity(rows.num_rows());
        for pos in 0..rows.num_rows() {
            let (chunk, offset) = rows.resolve(pos);
            let array = table
                .column_chunk(0, chunk)
                .as_any()
                .downcast_ref::<Int64Array>()
                .expect("test tables are int64");
            values.push(array.value(offset));
        }
        Ok(Value::Column(std::sync::Arc::new(Int64Array::from(values))))
    }

    fn evaluate_value(&self, _program: &Program, input: Value) -> Result<Value> {
        Ok(input)
    }
}

fn schema() -> TableSchema {
    TableSchema::new(vec![ColumnSpec::new("amount", ColumnType::Int64)])
}

#[test]
fn ingested_shards_are_visible_to_a_distributed_apply() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataframeStore::new(dir.path());
    let cancel = CancelToken::new();

    for (shard, values) in [(0_u64, vec![1_i64, 2]), (1, vec![3]), (2, vec![4, 5])] {
        let cs = ChangesetRequest::new(
            schema(),
            (0..values.len() as i64).collect(),
            vec![ColumnValues::Int64(values)],
        );
        store.apply_changeset("orders", shard, &cs, &cancel).unwrap();
    }

    let request = ApplyRequest {
        program: Program::new("first column"),
        reduce_program: None,
        combine: CombineOp::Concat,
        remote: false,
    };
    let executor = ApplyExecutor::new(&store, GatherEvaluator, MapReduceEngine::new(3).unwrap());
    let out = executor
        .execute_apply("orders", &[0, 1, 2], &request, None, &cancel)
        .unwrap();

    // Concat is applied in arrival order, so only the multiset of gathered
    // values is deterministic.
    let Value::Column(column) = out else {
        panic!("expected a column result");
    };
    let column = column.as_any().downcast_ref::<Int64Array>().unwrap();
    let mut values: Vec<i64> = column.values().iter().copied().collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[test]
fn updates_are_visible_to_subsequent_queries() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataframeStore::new(dir.path());
    let cancel = CancelToken::new();

    let cs = ChangesetRequest::new(schema(), vec![0, 1], vec![ColumnValues::Int64(vec![10, 20])]);
    store.apply_changeset("orders", 0, &cs, &cancel).unwrap();

    // Overwrite row 1 and extend to row 3.
    let cs = ChangesetRequest::new(schema(), vec![1, 3], vec![ColumnValues::Int64(vec![99, 40])]);
    store.apply_changeset("orders", 0, &cs, &cancel).unwrap();

    let request = ApplyRequest::new(Program::new("first column"));
    let executor = ApplyExecutor::new(&store, GatherEvaluator, MapReduceEngine::new(1).unwrap());
    let out = executor
        .execute_apply("orders", &[0], &request, None, &cancel)
        .unwrap();

    let Value::Column(column) = out else {
        panic!("expected a column result");
    };
    let column = column.as_any().downcast_ref::<Int64Array>().unwrap();
    assert_eq!(column.values().as_ref(), &[10, 99, 0, 40]);
}
